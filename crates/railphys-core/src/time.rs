use std::fmt;
use std::ops::Add;
use std::time::Duration;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SimTime
// ---------------------------------------------------------------------------

/// Integer-nanosecond simulation clock.
///
/// Advanced once per fixed physics tick by the core plugin. Integer nanos
/// keep long sessions free of floating-point drift, which matters for the
/// bell re-trigger schedule (3 s windows compared across hours of play).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, Resource,
)]
pub struct SimTime {
    nanos: u64,
}

impl SimTime {
    /// A `SimTime` at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { nanos: 0 }
    }

    /// Build from seconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_secs(secs: f64) -> Self {
        Self {
            nanos: (secs * 1_000_000_000.0) as u64,
        }
    }

    /// Raw nanosecond count.
    #[must_use]
    pub const fn nanos(&self) -> u64 {
        self.nanos
    }

    /// Elapsed seconds as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Elapsed seconds as `f32`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn secs_f32(&self) -> f32 {
        self.nanos as f32 / 1_000_000_000.0
    }

    /// Advance by `delta_secs` seconds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn advance_secs(&mut self, delta_secs: f64) {
        let delta_nanos = (delta_secs * 1_000_000_000.0) as u64;
        self.nanos = self.nanos.saturating_add(delta_nanos);
    }

    /// Reset to zero.
    pub fn reset(&mut self) {
        self.nanos = 0;
    }
}

impl Add<Duration> for SimTime {
    type Output = Self;

    #[allow(clippy::cast_possible_truncation)]
    fn add(self, rhs: Duration) -> Self {
        Self {
            nanos: self.nanos.saturating_add(rhs.as_nanos() as u64),
        }
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.nanos / 1_000_000_000;
        let millis = (self.nanos % 1_000_000_000) / 1_000_000;
        write!(f, "{secs}.{millis:03}s")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zero() {
        assert_eq!(SimTime::new().nanos(), 0);
    }

    #[test]
    fn from_secs() {
        let t = SimTime::from_secs(2.5);
        assert_eq!(t.nanos(), 2_500_000_000);
        assert!((t.secs_f64() - 2.5).abs() < 1e-9);
        assert!((t.secs_f32() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn advance_accumulates() {
        let mut t = SimTime::new();
        t.advance_secs(0.02);
        t.advance_secs(0.02);
        assert_eq!(t.nanos(), 40_000_000);
    }

    #[test]
    fn reset_clears() {
        let mut t = SimTime::from_secs(7.0);
        t.reset();
        assert_eq!(t.nanos(), 0);
    }

    #[test]
    fn add_duration() {
        let t = SimTime::from_secs(1.0) + Duration::from_secs(3);
        assert_eq!(t.nanos(), 4_000_000_000);
    }

    #[test]
    fn ordering_for_schedules() {
        let now = SimTime::from_secs(10.0);
        let next = SimTime::from_secs(9.0) + Duration::from_secs(3);
        // 12s > 10s: re-trigger window still open
        assert!(now < next);
    }

    #[test]
    fn display_format() {
        let t = SimTime::from_secs(1.234);
        assert_eq!(t.to_string(), "1.234s");
    }
}
