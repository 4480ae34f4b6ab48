//! railphys-core: config, errors, simulation time, and system ordering for
//! the railphys physics rework.
//!
//! The rework runs entirely inside the host simulation's fixed-timestep
//! update. [`RailphysCorePlugin`] establishes the per-tick ordering that the
//! rest of the stack relies on:
//!
//! ```text
//! Control ──► Maintain ──► React ──► Diagnose
//! (rotation)  (thresholds) (breaks,  (logging)
//!                           derails)
//! ```
//!
//! Threshold maintenance always runs before break-event handling within one
//! tick, so a joint armed or restored this tick is seen consistently by the
//! break listener.

pub mod config;
pub mod error;
pub mod seed;
pub mod time;

use bevy::prelude::*;

use crate::config::ReworkConfig;
use crate::time::SimTime;

// ---------------------------------------------------------------------------
// RailphysSet
// ---------------------------------------------------------------------------

/// Per-tick system ordering for the rework.
///
/// Configured as a strict chain by [`RailphysCorePlugin`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RailphysSet {
    /// Operator input and rotation control (turntables).
    Control,
    /// Per-tick joint threshold maintenance (stress engine).
    Maintain,
    /// Reaction to host events: joint breaks, derailments, consist changes.
    React,
    /// Diagnostics and fire-and-forget effect dispatch.
    Diagnose,
}

// ---------------------------------------------------------------------------
// RailphysCorePlugin
// ---------------------------------------------------------------------------

/// Core plugin: registers [`RailphysSet`] ordering, the [`ReworkConfig`]
/// resource, and the [`SimTime`] clock.
///
/// Every other railphys plugin requires this one.
pub struct RailphysCorePlugin;

impl Plugin for RailphysCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ReworkConfig>()
            .init_resource::<SimTime>()
            .configure_sets(
                Update,
                (
                    RailphysSet::Control,
                    RailphysSet::Maintain,
                    RailphysSet::React,
                    RailphysSet::Diagnose,
                )
                    .chain(),
            )
            .add_systems(PreUpdate, advance_sim_time);
    }
}

/// Advances [`SimTime`] by one fixed physics timestep per update.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
fn advance_sim_time(config: Res<ReworkConfig>, mut time: ResMut<SimTime>) {
    time.advance_secs(config.physics_dt);
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::config::{ReworkConfig, WarningSound};
    pub use crate::time::SimTime;
    pub use crate::{RailphysCorePlugin, RailphysSet};
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
