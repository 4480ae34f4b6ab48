//! Framework-agnostic turntable rotation control.
//!
//! Pure Rust library with no game engine dependencies. Implements the full
//! per-tick pipeline that turns operator input into a bounded target-rotation
//! update:
//!
//! ```text
//! Lever/Push ─► Input Mapping ─► Drive / Snap Search ─► Braked Approach ─► Target Rotation
//!               (dead zone)      (directional window)   (ratcheted table)
//! ```
//!
//! # Quick Start
//!
//! ```
//! use railphys_turntable_core::prelude::*;
//!
//! let mut state = TurntableState::new(0.0, 0.0, 1.0);
//! let settings = ControllerSettings {
//!     rotation_speed_multiplier: 1.0,
//!     snap_tolerance_deg: 20.0,
//!     push_to_detect: false,
//! };
//! let track_ends = [10.0];
//!
//! // Drive positive for a tick, then release: the controller finds the
//! // track end at 10 degrees and starts a braked approach toward it.
//! let drive = DriveInput { positive: 1.0, negative: 0.0, is_push: false };
//! state.step(drive, &track_ends, &settings, 0.02);
//! state.step(DriveInput::default(), &track_ends, &settings, 0.02);
//! assert_eq!(state.phase(), Phase::SearchingSnap);
//! state.step(DriveInput::default(), &track_ends, &settings, 0.02);
//! assert_eq!(state.phase(), Phase::Snapping);
//! ```

pub mod angle;
pub mod brake;
pub mod controller;
pub mod input;
pub mod snap;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::angle::{angles_equal, normalize_360, normalize_signed_180, SNAP_EPSILON_DEG};
    pub use crate::brake::brake_factor;
    pub use crate::controller::{ControllerSettings, Phase, TickOutcome, TurntableState};
    pub use crate::input::{DriveInput, OperatorInput};
    pub use crate::snap::{closest_snap_angle, find_snap_angle, SnapTarget};
}
