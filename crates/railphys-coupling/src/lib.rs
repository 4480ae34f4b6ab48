//! railphys-coupling: probabilistic coupler failure and brake-hose venting.
//!
//! Tracks every coupled joint in a side-table resource
//! ([`JointFailureRegistry`](registry::JointFailureRegistry)), arms a random
//! subset for stress failure on consist changes, maintains break thresholds
//! every tick, and weakens joints on derailments.
//!
//! # Ordering
//!
//! Threshold maintenance and hose venting run in `Maintain`; consist
//! refresh, derail rolls, and break handling run afterwards in `React`, in
//! that order. A joint armed or restored in a tick is therefore always seen
//! consistently by that tick's break handling.

pub mod components;
pub mod derail;
pub mod events;
pub mod hose;
pub mod registry;
pub mod rng;
pub mod stress;

use bevy::prelude::*;
use railphys_core::RailphysSet;

use crate::derail::derail_system;
use crate::events::{ConsistRefreshEvent, CouplerBroken, DerailEvent, JointBreakEvent};
use crate::hose::hose_vent_system;
use crate::registry::JointFailureRegistry;
use crate::rng::FailureRng;
use crate::stress::{consist_refresh_system, joint_break_system, stress_maintenance_system};

/// Coupler failure model plugin.
///
/// Requires [`RailphysCorePlugin`](railphys_core::RailphysCorePlugin).
pub struct RailphysCouplingPlugin;

impl Plugin for RailphysCouplingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<JointFailureRegistry>()
            .init_resource::<FailureRng>()
            .add_event::<ConsistRefreshEvent>()
            .add_event::<JointBreakEvent>()
            .add_event::<DerailEvent>()
            .add_event::<CouplerBroken>()
            .add_systems(
                Update,
                (stress_maintenance_system, hose_vent_system).in_set(RailphysSet::Maintain),
            )
            .add_systems(
                Update,
                (consist_refresh_system, derail_system, joint_break_system)
                    .chain()
                    .in_set(RailphysSet::React),
            );
    }
}

pub mod prelude {
    pub use crate::components::{
        BrakeHose, Coupler, CouplerJoint, CouplerState, TrainCar, MIN_BREAK_FORCE,
        UNBREAKABLE_FORCE,
    };
    pub use crate::events::{ConsistRefreshEvent, CouplerBroken, DerailEvent, JointBreakEvent};
    pub use crate::registry::{JointFailureRegistry, JointRecord};
    pub use crate::rng::FailureRng;
    pub use crate::RailphysCouplingPlugin;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
