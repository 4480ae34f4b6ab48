//! Events emitted by the turntable systems.
//!
//! All of these are fire-and-forget requests toward the host's audio and
//! effect layers; nothing in the rework waits on them.

use bevy::prelude::*;
use railphys_core::prelude::WarningSound;

/// The table moved this tick in a way that qualifies for the warning bell.
///
/// Rate limiting happens downstream in the bell scheduler, not here.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BellRingRequest {
    pub turntable: Entity,
}

/// A warning sound was actually played for a turntable.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BellPlayed {
    pub turntable: Entity,
    pub sound: WarningSound,
}

/// The bridge aligned with a snap target this tick.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TrackConnected {
    pub turntable: Entity,
    pub angle_deg: f32,
}

/// Refresh the proximity cue with the distance to the nearest track end.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SnapAudioRequest {
    pub turntable: Entity,
    pub closest_deg: f32,
}
