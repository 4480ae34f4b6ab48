//! ECS components for turntable control.
//!
//! A controlled turntable entity carries [`Turntable`] plus the host-facing
//! [`BridgeRotation`]. [`TurntableLever`] and [`TrackEndLayout`] are optional:
//! a missing lever degrades that table to a logged no-op, a missing layout
//! simply means snap detection never finds anything.

use bevy::prelude::*;
use railphys_turntable_core::prelude::{OperatorInput, TurntableState};

// ---------------------------------------------------------------------------
// BridgeRotation
// ---------------------------------------------------------------------------

/// Host-side rotation interface of the turntable bridge.
///
/// The host writes `current_deg` from its rigid body each tick; the rework
/// writes `target_deg` and scales `speed_multiplier`, restoring the vanilla
/// multiplier when the tweaks are disabled.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct BridgeRotation {
    /// Measured bridge rotation, degrees.
    pub current_deg: f32,
    /// Commanded rotation the bridge servo chases, degrees.
    pub target_deg: f32,
    /// The bridge's drive speed multiplier.
    pub speed_multiplier: f32,
}

impl Default for BridgeRotation {
    fn default() -> Self {
        Self {
            current_deg: 0.0,
            target_deg: 0.0,
            speed_multiplier: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Turntable
// ---------------------------------------------------------------------------

/// Controller state for one turntable.
///
/// Primed from [`BridgeRotation`] on the first controlled tick, which also
/// captures the vanilla speed multiplier for later restore.
#[derive(Component, Debug, Clone, Default)]
pub struct Turntable {
    state: Option<TurntableState>,
}

impl Turntable {
    /// The controller state, priming it from the bridge on first access.
    pub fn state_mut(&mut self, bridge: &BridgeRotation) -> &mut TurntableState {
        self.state.get_or_insert_with(|| {
            TurntableState::new(
                bridge.current_deg,
                bridge.target_deg,
                bridge.speed_multiplier,
            )
        })
    }

    /// The controller state, if this table has been ticked at least once.
    #[must_use]
    pub fn state(&self) -> Option<&TurntableState> {
        self.state.as_ref()
    }

    /// The vanilla speed multiplier captured at priming time.
    #[must_use]
    pub fn vanilla_speed_multiplier(&self) -> Option<f32> {
        self.state.as_ref().map(|s| s.speed_multiplier)
    }
}

// ---------------------------------------------------------------------------
// TurntableLever
// ---------------------------------------------------------------------------

/// Raw operator input for one turntable, refreshed by the host each tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct TurntableLever {
    pub input: OperatorInput,
}

// ---------------------------------------------------------------------------
// TrackEndLayout
// ---------------------------------------------------------------------------

/// Opening angles of the track ends around the pit, degrees.
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct TrackEndLayout {
    pub ends_deg: Vec<f32>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turntable_primes_from_bridge() {
        let bridge = BridgeRotation {
            current_deg: 45.0,
            target_deg: 45.0,
            speed_multiplier: 2.0,
        };
        let mut table = Turntable::default();
        assert!(table.state().is_none());

        let state = table.state_mut(&bridge);
        assert!((state.current_rotation_deg - 45.0).abs() < f32::EPSILON);
        assert!((state.speed_multiplier - 2.0).abs() < f32::EPSILON);
        assert_eq!(table.vanilla_speed_multiplier(), Some(2.0));
    }

    #[test]
    fn priming_happens_once() {
        let mut table = Turntable::default();
        table.state_mut(&BridgeRotation {
            current_deg: 10.0,
            ..Default::default()
        });
        // A later bridge value must not re-prime.
        let state = table.state_mut(&BridgeRotation {
            current_deg: 99.0,
            ..Default::default()
        });
        assert!((state.current_rotation_deg - 10.0).abs() < f32::EPSILON);
    }
}
