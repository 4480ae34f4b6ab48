//! Host notifications consumed by the failure model, plus the structured
//! break diagnostic it emits.

use bevy::prelude::*;

/// The player entered or changed a consist; `cars` is its full car list.
///
/// Seeds which joints are eligible to break before any stress is applied.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ConsistRefreshEvent {
    pub cars: Vec<Entity>,
}

/// The host's physics broke a coupler joint.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointBreakEvent {
    pub joint: Entity,
}

/// A vehicle derailed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerailEvent {
    pub car: Entity,
}

/// Diagnostic emitted when an armed joint actually broke.
///
/// `coupler` is the affected coupler head when one could be identified:
/// preferred by joint identity, else a loose attached one, else any coupled
/// one among the joint's registered sides.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CouplerBroken {
    pub joint: Entity,
    pub coupler: Option<Entity>,
}
