//! Operator input mapping.
//!
//! The rotation lever is a `[0, 1]` axis with a dead zone in the middle:
//! values above 0.55 drive positive, values below 0.45 drive negative, and
//! the band between produces no motion. Physical pushes on the bridge
//! override the lever entirely.

/// Remap `v` from `[a, b]` into `[0, 1]`, clamped.
#[must_use]
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if (a - b).abs() < f32::EPSILON {
        return 0.0;
    }
    ((v - a) / (b - a)).clamp(0.0, 1.0)
}

/// Drive command for one tick, already resolved to magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveInput {
    /// Positive-direction magnitude in `[0, 1]`.
    pub positive: f32,
    /// Negative-direction magnitude in `[0, 1]`.
    pub negative: f32,
    /// Whether the command came from a physical push rather than the lever.
    pub is_push: bool,
}

impl DriveInput {
    /// Whether this tick carries any drive at all.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.positive == 0.0 && self.negative == 0.0
    }
}

/// Raw per-tick operator state, before dead-zone mapping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OperatorInput {
    /// Lever axis in `[0, 1]`, or `None` when the control is not present.
    pub lever: Option<f32>,
    /// Physical push magnitude in the positive direction.
    pub push_positive: f32,
    /// Physical push magnitude in the negative direction.
    pub push_negative: f32,
    /// Whether lever control is currently permitted (false while the
    /// operator is away from the control stand).
    pub control_allowed: bool,
}

impl OperatorInput {
    /// Resolve to a [`DriveInput`], or `None` when the lever is missing.
    ///
    /// Pushes override the lever in their direction; a positive command
    /// takes priority when both directions are non-zero. With control not
    /// allowed the lever reads as centered, so only pushes move the table.
    #[must_use]
    pub fn resolve(&self) -> Option<DriveInput> {
        let lever = self.lever?;
        let v = if self.control_allowed { lever } else { 0.5 };

        let (positive, pos_is_push) = if self.push_positive != 0.0 {
            (self.push_positive, true)
        } else {
            (inverse_lerp(0.55, 1.0, v), false)
        };
        let (negative, neg_is_push) = if self.push_negative != 0.0 {
            (self.push_negative, true)
        } else {
            (inverse_lerp(0.45, 0.0, v), false)
        };

        let drive = if positive > 0.0 {
            DriveInput {
                positive,
                negative: 0.0,
                is_push: pos_is_push,
            }
        } else if negative > 0.0 {
            DriveInput {
                positive: 0.0,
                negative,
                is_push: neg_is_push,
            }
        } else {
            DriveInput::default()
        };
        Some(drive)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
