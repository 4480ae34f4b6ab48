//! Directional snap detection against track-end openings.
//!
//! The turntable bridge has two openings, front at the current rotation and
//! rear at current + 180. When the operator releases the controls, the search
//! looks ahead of the last drive direction only: a candidate qualifies when
//! the directional distance from either opening to it lies in `(0, tol]`.

use crate::angle::{arc_distance, normalize_360};

/// A qualifying track end found by [`find_snap_angle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    /// Opening angle of the matched track end, normalized to `[0, 360)`.
    pub angle_deg: f32,
    /// Direction the approach will travel: `+1` or `-1`.
    pub direction: i8,
}

/// Find the nearest track end ahead of `direction` within `tolerance_deg`.
///
/// Returns `None` when the tolerance is non-positive, the direction is not
/// `+1`/`-1`, or no opening qualifies. Ties keep the first qualifying end in
/// `track_ends` order.
#[must_use]
pub fn find_snap_angle(
    current_deg: f32,
    track_ends: &[f32],
    direction: i8,
    tolerance_deg: f32,
) -> Option<SnapTarget> {
    if tolerance_deg <= 0.0 {
        return None;
    }
    if direction != 1 && direction != -1 {
        return None;
    }

    let front = normalize_360(current_deg);
    let rear = normalize_360(current_deg + 180.0);

    let mut best: Option<SnapTarget> = None;
    let mut best_dist = f32::INFINITY;

    for &raw_end in track_ends {
        let end = normalize_360(raw_end);
        for opening in [front, rear] {
            // Directional distance from the opening forward to the end.
            let mut d = normalize_360(end - opening);
            if direction == -1 {
                d = 360.0 - d;
            }
            if d > 0.0 && d <= tolerance_deg && d < best_dist {
                best_dist = d;
                best = Some(SnapTarget {
                    angle_deg: end,
                    direction,
                });
            }
        }
    }

    best
}

/// Shortest-arc distance from either opening to the nearest track end.
///
/// Drives the proximity cue while the operator is still rotating. `None`
/// when there are no track ends.
#[must_use]
pub fn closest_snap_angle(current_deg: f32, track_ends: &[f32]) -> Option<f32> {
    let front = normalize_360(current_deg);
    let rear = normalize_360(current_deg + 180.0);

    track_ends
        .iter()
        .map(|&end| {
            let d_front = arc_distance(front, end);
            let d_rear = arc_distance(rear, end);
            d_front.min(d_rear)
        })
        .fold(None, |acc: Option<f32>, d| {
            Some(acc.map_or(d, |a| a.min(d)))
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
