//! Stress failure engine.
//!
//! Two cadences, deliberately kept as separate systems:
//!
//! - [`stress_maintenance_system`] runs every tick and recomputes each live
//!   joint's break thresholds from its coupler state and armed flag.
//! - [`consist_refresh_system`] runs only when the host signals a consist
//!   change and rolls which joints are armed to break at all.
//!
//! [`joint_break_system`] consumes the host's break notifications, disarms
//! the joint, and emits the break diagnostic. Maintenance is scheduled
//! ahead of it, so a joint armed or restored this tick is seen consistently
//! by the break handling.

use std::collections::HashSet;

use bevy::prelude::*;
use rand::Rng;
use railphys_core::error::SimError;
use railphys_core::prelude::ReworkConfig;

use crate::components::{Coupler, CouplerJoint, CouplerState, TrainCar, UNBREAKABLE_FORCE};
use crate::events::{ConsistRefreshEvent, CouplerBroken, JointBreakEvent};
use crate::registry::JointFailureRegistry;
use crate::rng::FailureRng;

// ---------------------------------------------------------------------------
// Per-tick threshold maintenance
// ---------------------------------------------------------------------------

/// Recomputes break thresholds for every coupled joint, every tick.
///
/// Runs in [`RailphysSet::Maintain`](railphys_core::RailphysSet::Maintain).
/// Stress failure is only possible while a coupler is loose attached; any
/// other coupled state pins the joint unbreakable and disarms it. A stress
/// chance of zero pins the joint unbreakable for the rest of the session.
/// Parked couplers are skipped outright: no registration, no writes.
///
/// With `coupling.enable_failure` off, known joints get their vanilla
/// thresholds back instead.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn stress_maintenance_system(
    config: Res<ReworkConfig>,
    mut registry: ResMut<JointFailureRegistry>,
    couplers: Query<(Entity, &Coupler)>,
    mut joints: Query<&mut CouplerJoint>,
) {
    for (coupler_entity, coupler) in &couplers {
        if coupler.state == CouplerState::Parked {
            continue;
        }
        let Some(joint_entity) = coupler.joint else {
            continue;
        };
        let Ok(mut joint) = joints.get_mut(joint_entity) else {
            if config.log.coupler {
                debug!(
                    "coupler {coupler_entity}: {}",
                    SimError::StaleReference("coupler joint")
                );
            }
            continue;
        };

        if !config.coupling.enable_failure {
            registry.disarm(joint_entity);
            if let Some(record) = registry.get(joint_entity) {
                let (force, torque) = record.vanilla_thresholds();
                joint.set_thresholds(force, torque);
            }
            continue;
        }

        // Vanilla thresholds are captured here, before any write.
        registry.register(
            joint_entity,
            coupler_entity,
            joint.break_force,
            joint.break_torque,
        );

        if config.coupling.stress_chance() <= 0.0 {
            if let Some(record) = registry.get_mut(joint_entity) {
                record.unbreakable = true;
            }
        }

        let record = registry
            .get(joint_entity)
            .map(|r| (r.unbreakable, r.weakened, r.vanilla_thresholds()));
        let Some((unbreakable, weakened, vanilla)) = record else {
            continue;
        };

        // A derail-weakened joint keeps its weakened thresholds.
        if weakened {
            continue;
        }

        if unbreakable || coupler.state != CouplerState::AttachedLoose {
            joint.set_thresholds(UNBREAKABLE_FORCE, UNBREAKABLE_FORCE);
            registry.disarm(joint_entity);
        } else if registry.is_armed(joint_entity) {
            let force = config.coupling.custom_break_force;
            joint.set_thresholds(force, force);
        } else {
            joint.set_thresholds(vanilla.0, vanilla.1);
        }
    }
}

// ---------------------------------------------------------------------------
// Consist-refresh arming
// ---------------------------------------------------------------------------

/// Rolls per-joint break eligibility when the player's consist changes.
///
/// Each distinct coupled joint in the consist is rolled exactly once per
/// refresh (deduplicated within the pass, since both sides of a joint show
/// up in the coupler enumeration): a uniform sample at or below the stress
/// chance arms the joint, anything else disarms it.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn consist_refresh_system(
    config: Res<ReworkConfig>,
    mut registry: ResMut<JointFailureRegistry>,
    mut rng: ResMut<FailureRng>,
    mut events: EventReader<ConsistRefreshEvent>,
    cars: Query<&TrainCar>,
    couplers: Query<(Entity, &Coupler)>,
    joints: Query<&CouplerJoint>,
) {
    if !config.coupling.enable_failure {
        events.clear();
        return;
    }
    let chance = config.coupling.stress_chance();

    for event in events.read() {
        if config.log.coupler {
            log_consist(&event.cars, &cars);
        }

        let consist: HashSet<Entity> = event.cars.iter().copied().collect();
        let mut rolled: HashSet<Entity> = HashSet::new();

        for (coupler_entity, coupler) in &couplers {
            if !consist.contains(&coupler.car) {
                continue;
            }
            let Some(joint_entity) = coupler.joint else {
                continue;
            };
            let Ok(joint) = joints.get(joint_entity) else {
                continue;
            };

            registry.register(
                joint_entity,
                coupler_entity,
                joint.break_force,
                joint.break_torque,
            );
            if !rolled.insert(joint_entity) {
                continue;
            }

            if rng.stress.gen::<f32>() <= chance {
                registry.arm(joint_entity);
            } else {
                registry.disarm(joint_entity);
            }
        }

        if config.log.coupler {
            debug!("consist refresh: rolled {} joints", rolled.len());
        }
    }
}

fn log_consist(car_entities: &[Entity], cars: &Query<&TrainCar>) {
    let mut locos = 0usize;
    let mut wagons = 0usize;
    let mut ids = Vec::with_capacity(car_entities.len());
    for &entity in car_entities {
        if let Ok(car) = cars.get(entity) {
            if car.is_loco {
                locos += 1;
            } else {
                wagons += 1;
            }
            ids.push(car.car_id.clone());
        }
    }
    debug!(
        "consist refresh: {locos} locos, {wagons} cars [{}]",
        ids.join(", ")
    );
}

// ---------------------------------------------------------------------------
// Break handling
// ---------------------------------------------------------------------------

/// Handles the host's joint-break notifications.
///
/// Unknown and unarmed joints are logged and ignored. An armed joint is
/// disarmed and a [`CouplerBroken`] diagnostic emitted, naming the affected
/// coupler when one can still be identified.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn joint_break_system(
    config: Res<ReworkConfig>,
    mut registry: ResMut<JointFailureRegistry>,
    mut events: EventReader<JointBreakEvent>,
    couplers: Query<&Coupler>,
    mut broken: EventWriter<CouplerBroken>,
) {
    for event in events.read() {
        let Some(record) = registry.get(event.joint) else {
            if config.log.coupler {
                debug!(
                    "break event for joint {}: {}",
                    event.joint,
                    SimError::StaleReference("joint record")
                );
            }
            continue;
        };
        if !registry.is_armed(event.joint) {
            if config.log.coupler {
                debug!("break event for joint {}: not armed, ignoring", event.joint);
            }
            continue;
        }

        // Snapshot the live sides; registry entries may be stale.
        let sides: Vec<(Entity, Coupler)> = record
            .couplers()
            .iter()
            .filter_map(|&c| couplers.get(c).ok().map(|coupler| (c, *coupler)))
            .collect();

        registry.disarm(event.joint);

        let affected = choose_affected_coupler(event.joint, &sides);
        if config.log.coupler {
            debug!(
                "joint {} broke; sides {:?}, affected {:?}",
                event.joint,
                sides.iter().map(|(e, _)| *e).collect::<Vec<_>>(),
                affected
            );
        }
        broken.send(CouplerBroken {
            joint: event.joint,
            coupler: affected,
        });
    }
}

/// Pick the coupler to report for a break on `joint`.
///
/// Preference order: a side still referencing the joint, else a loose
/// attached side, else any still-coupled side.
#[must_use]
pub fn choose_affected_coupler(joint: Entity, sides: &[(Entity, Coupler)]) -> Option<Entity> {
    sides
        .iter()
        .find(|(_, c)| c.joint == Some(joint))
        .or_else(|| {
            sides
                .iter()
                .find(|(_, c)| c.state == CouplerState::AttachedLoose)
        })
        .or_else(|| sides.iter().find(|(_, c)| c.is_coupled()))
        .map(|(entity, _)| *entity)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
