//! Ratcheted braking profile for the snap approach.
//!
//! As the table closes on its snap target, the approach speed is scaled by a
//! stepped factor keyed to the remaining distance. The factor only ever
//! tightens within one approach (a ratchet), so a transient distance increase
//! from overshoot never speeds the table back up.

/// Distance bands (degrees remaining) paired with the speed factor that
/// applies at or below that distance. Evaluated top to bottom; later rows
/// overwrite earlier ones, so the tightest qualifying band wins.
const BRAKE_TABLE: [(f32, f32); 8] = [
    (5.0, 0.80),
    (4.0, 0.70),
    (3.0, 0.60),
    (2.0, 0.50),
    (1.5, 0.40),
    (1.0, 0.30),
    (0.7, 0.15),
    (0.4, 0.05),
];

/// Speed factor for the current approach step.
///
/// `remaining_deg` is the distance still to cover; `previous` is the factor
/// used on the last step of this same approach (start each approach at 1.0).
/// The result never exceeds `previous`.
#[must_use]
pub fn brake_factor(remaining_deg: f32, previous: f32) -> f32 {
    let mut target = 1.0;
    for (bound, factor) in BRAKE_TABLE {
        if remaining_deg <= bound {
            target = factor;
        }
    }
    target.min(previous)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
