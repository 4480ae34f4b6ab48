//! Angle normalization and shortest-arc comparison.
//!
//! All angles are degrees. Every function here is pure and total; callers
//! never need to pre-normalize.

/// Default tolerance for "the table is aligned with this angle" checks.
pub const SNAP_EPSILON_DEG: f32 = 0.05;

/// Normalize an angle into `[0, 360)`.
#[must_use]
pub fn normalize_360(deg: f32) -> f32 {
    let r = deg % 360.0;
    let r = if r < 0.0 { r + 360.0 } else { r };
    // f32 rounding can land `r + 360.0` exactly on 360 for tiny negatives.
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Normalize an angle into `(-180, 180]`.
#[must_use]
pub fn normalize_signed_180(deg: f32) -> f32 {
    let r = normalize_360(deg);
    if r > 180.0 {
        r - 360.0
    } else {
        r
    }
}

/// Shortest-arc distance between two angles, in `[0, 180]`.
#[must_use]
pub fn arc_distance(a_deg: f32, b_deg: f32) -> f32 {
    normalize_signed_180(a_deg - b_deg).abs()
}

/// Whether two angles coincide within `eps_deg` along the shortest arc.
#[must_use]
pub fn angles_equal(a_deg: f32, b_deg: f32, eps_deg: f32) -> bool {
    arc_distance(a_deg, b_deg) <= eps_deg
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
