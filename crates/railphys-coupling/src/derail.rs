//! Derail failure roll.
//!
//! A derailment gives every attached coupler on the derailed vehicle an
//! independent chance of tearing out: a successful roll drops the joint's
//! break thresholds to the minimum breakable value, so the next applied
//! force finishes the job. One-shot and irreversible, and entirely
//! independent of the stress arming mechanism.

use bevy::prelude::*;
use rand::Rng;
use railphys_core::error::SimError;
use railphys_core::prelude::ReworkConfig;

use crate::components::{Coupler, CouplerJoint, MIN_BREAK_FORCE};
use crate::events::DerailEvent;
use crate::registry::JointFailureRegistry;
use crate::rng::FailureRng;

/// Rolls coupler failure for each derailed vehicle.
///
/// Runs in [`RailphysSet::React`](railphys_core::RailphysSet::React). Only
/// loose or tight attached, coupled couplers participate; each is rolled
/// exactly once per derail event.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn derail_system(
    config: Res<ReworkConfig>,
    mut registry: ResMut<JointFailureRegistry>,
    mut rng: ResMut<FailureRng>,
    mut events: EventReader<DerailEvent>,
    couplers: Query<(Entity, &Coupler)>,
    mut joints: Query<&mut CouplerJoint>,
) {
    if !config.coupling.enable_failure {
        events.clear();
        return;
    }
    let chance = config.coupling.derail_chance();

    for event in events.read() {
        for (coupler_entity, coupler) in &couplers {
            if coupler.car != event.car || !coupler.state.is_attached() {
                continue;
            }
            let Some(joint_entity) = coupler.joint else {
                continue;
            };
            if rng.derail.gen::<f32>() > chance {
                continue;
            }

            let Ok(mut joint) = joints.get_mut(joint_entity) else {
                if config.log.derail {
                    debug!(
                        "derailed coupler {coupler_entity}: {}",
                        SimError::StaleReference("coupler joint")
                    );
                }
                continue;
            };
            // Record the weakening so threshold maintenance leaves it alone.
            registry.register(
                joint_entity,
                coupler_entity,
                joint.break_force,
                joint.break_torque,
            );
            if let Some(record) = registry.get_mut(joint_entity) {
                record.weakened = true;
            }

            joint.set_thresholds(MIN_BREAK_FORCE, MIN_BREAK_FORCE);
            if config.log.derail {
                debug!(
                    "derail on car {}: weakened joint {joint_entity} via coupler {coupler_entity}",
                    event.car
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
