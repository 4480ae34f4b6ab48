//! railphys-turntable: bevy integration for the turntable controller.
//!
//! Wraps the pure controller from `railphys-turntable-core` in ECS
//! components and a per-tick system, and adds the warning-bell scheduler
//! with the warning-sound fallback chain.
//!
//! # Entity anatomy
//!
//! A controlled turntable carries [`Turntable`](components::Turntable) and
//! [`BridgeRotation`](components::BridgeRotation); the host refreshes
//! [`TurntableLever`](components::TurntableLever) with operator input and
//! supplies the pit's [`TrackEndLayout`](components::TrackEndLayout).

pub mod bell;
pub mod components;
pub mod events;
pub mod systems;

use bevy::prelude::*;
use railphys_core::RailphysSet;

use crate::bell::{bell_system, BellSchedule, SoundLibrary};
use crate::events::{BellPlayed, BellRingRequest, SnapAudioRequest, TrackConnected};
use crate::systems::turntable_step_system;

/// Turntable rotation control and warning-bell plugin.
///
/// Requires [`RailphysCorePlugin`](railphys_core::RailphysCorePlugin).
pub struct RailphysTurntablePlugin;

impl Plugin for RailphysTurntablePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoundLibrary>()
            .init_resource::<BellSchedule>()
            .add_event::<BellRingRequest>()
            .add_event::<BellPlayed>()
            .add_event::<TrackConnected>()
            .add_event::<SnapAudioRequest>()
            .add_systems(
                Update,
                turntable_step_system.in_set(RailphysSet::Control),
            )
            .add_systems(Update, bell_system.in_set(RailphysSet::Diagnose));
    }
}

pub mod prelude {
    pub use crate::bell::{BellSchedule, SoundLibrary, BELL_RETRIGGER};
    pub use crate::components::{BridgeRotation, TrackEndLayout, Turntable, TurntableLever};
    pub use crate::events::{BellPlayed, BellRingRequest, SnapAudioRequest, TrackConnected};
    pub use crate::RailphysTurntablePlugin;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
