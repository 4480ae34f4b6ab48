//! Per-tick turntable control system.

use bevy::prelude::*;
use railphys_core::error::SimError;
use railphys_core::prelude::ReworkConfig;
use railphys_turntable_core::prelude::ControllerSettings;

use crate::components::{BridgeRotation, TrackEndLayout, Turntable, TurntableLever};
use crate::events::{BellRingRequest, SnapAudioRequest, TrackConnected};

/// Steps every turntable controller once per fixed tick.
///
/// Runs in [`RailphysSet::Control`](railphys_core::RailphysSet::Control).
/// Reads the measured bridge rotation and operator lever, advances the
/// rotation state machine, and writes the new target rotation and scaled
/// speed multiplier back to the bridge. With the tweaks disabled, restores
/// the vanilla multiplier and leaves the table to the host controller.
///
/// A turntable with no lever cannot be controlled; it degrades to a logged
/// no-op for the tick rather than failing the system.
#[allow(clippy::cast_possible_truncation)] // f64 → f32 physics_dt
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn turntable_step_system(
    config: Res<ReworkConfig>,
    mut bell_events: EventWriter<BellRingRequest>,
    mut connect_events: EventWriter<TrackConnected>,
    mut audio_events: EventWriter<SnapAudioRequest>,
    mut query: Query<(
        Entity,
        &mut Turntable,
        &mut BridgeRotation,
        Option<&TurntableLever>,
        Option<&TrackEndLayout>,
    )>,
) {
    let dt = config.physics_dt as f32;
    let settings = ControllerSettings {
        rotation_speed_multiplier: config.turntable.rotation_speed_multiplier,
        snap_tolerance_deg: config.turntable.snap_tolerance(),
        push_to_detect: config.turntable.push_to_detect,
    };

    for (entity, mut table, mut bridge, lever, layout) in &mut query {
        if !config.turntable.enable_tweaks {
            if let Some(vanilla) = table.vanilla_speed_multiplier() {
                bridge.speed_multiplier = vanilla;
            }
            continue;
        }

        let Some(lever) = lever else {
            if config.log.turntable {
                debug!(
                    "turntable {entity}: {}",
                    SimError::MissingDependency("turntable lever")
                );
            }
            continue;
        };
        let Some(drive) = lever.input.resolve() else {
            if config.log.turntable {
                debug!(
                    "turntable {entity}: {}",
                    SimError::MissingDependency("lever axis value")
                );
            }
            continue;
        };

        let ends = layout.map_or(&[][..], |l| l.ends_deg.as_slice());

        let state = table.state_mut(bridge.as_ref());
        state.current_rotation_deg = bridge.current_deg;
        let outcome = state.step(drive, ends, &settings, dt);

        bridge.target_deg = state.target_rotation_deg;
        bridge.speed_multiplier =
            state.speed_multiplier * config.turntable.rotation_speed_multiplier;

        if outcome.bell_eligible {
            bell_events.send(BellRingRequest { turntable: entity });
        }
        if outcome.track_connected {
            connect_events.send(TrackConnected {
                turntable: entity,
                angle_deg: bridge.target_deg,
            });
            if config.log.turntable {
                debug!(
                    "turntable {entity}: connected at {:.2} deg",
                    bridge.target_deg
                );
            }
        }
        if let Some(closest_deg) = outcome.snap_proximity_deg {
            if outcome.rotated {
                audio_events.send(SnapAudioRequest {
                    turntable: entity,
                    closest_deg,
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RailphysTurntablePlugin;
    use railphys_core::RailphysCorePlugin;
    use railphys_turntable_core::prelude::OperatorInput;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(RailphysCorePlugin);
        app.add_plugins(RailphysTurntablePlugin);
        app
    }

    fn full_positive_lever() -> TurntableLever {
        TurntableLever {
            input: OperatorInput {
                lever: Some(1.0),
                control_allowed: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn drive_advances_target_rotation() {
        let mut app = test_app();
        let entity = app
            .world_mut()
            .spawn((
                Turntable::default(),
                BridgeRotation::default(),
                full_positive_lever(),
            ))
            .id();

        app.finish();
        app.cleanup();
        app.update();

        let bridge = app.world().get::<BridgeRotation>(entity).unwrap();
        // 12 deg/s × 1.0 lever × 1.0 vanilla × 0.5 config × 0.02 s
        assert!((bridge.target_deg - 0.12).abs() < 1e-4);
        // Host sees the scaled multiplier.
        assert!((bridge.speed_multiplier - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn drive_emits_bell_request() {
        let mut app = test_app();
        app.world_mut().spawn((
            Turntable::default(),
            BridgeRotation::default(),
            full_positive_lever(),
        ));

        app.finish();
        app.cleanup();
        app.update();

        let events = app.world().resource::<Events<BellRingRequest>>();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn missing_lever_is_a_no_op() {
        let mut app = test_app();
        let entity = app
            .world_mut()
            .spawn((Turntable::default(), BridgeRotation::default()))
            .id();

        app.finish();
        app.cleanup();
        app.update();

        let bridge = app.world().get::<BridgeRotation>(entity).unwrap();
        assert!(bridge.target_deg.abs() < f32::EPSILON);
        assert_eq!(app.world().resource::<Events<BellRingRequest>>().len(), 0);
    }

    #[test]
    fn disabled_tweaks_restore_vanilla_multiplier() {
        let mut app = test_app();
        let entity = app
            .world_mut()
            .spawn((
                Turntable::default(),
                BridgeRotation {
                    speed_multiplier: 2.0,
                    ..Default::default()
                },
                full_positive_lever(),
            ))
            .id();

        app.finish();
        app.cleanup();
        app.update();

        // Enabled tick scaled the multiplier down.
        let bridge = app.world().get::<BridgeRotation>(entity).unwrap();
        assert!((bridge.speed_multiplier - 1.0).abs() < f32::EPSILON);

        app.world_mut()
            .resource_mut::<ReworkConfig>()
            .turntable
            .enable_tweaks = false;
        app.update();

        let bridge = app.world().get::<BridgeRotation>(entity).unwrap();
        assert!((bridge.speed_multiplier - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn release_over_track_end_connects() {
        let mut app = test_app();
        let entity = app
            .world_mut()
            .spawn((
                Turntable::default(),
                BridgeRotation::default(),
                full_positive_lever(),
                TrackEndLayout {
                    ends_deg: vec![10.0],
                },
            ))
            .id();

        app.finish();
        app.cleanup();
        app.update();

        // Release the lever and let the approach run, chasing the target
        // with an ideal servo.
        app.world_mut().get_mut::<TurntableLever>(entity).unwrap().input.lever = Some(0.5);
        let mut connected = false;
        for _ in 0..10_000 {
            let mut bridge = app.world_mut().get_mut::<BridgeRotation>(entity).unwrap();
            bridge.current_deg = bridge.target_deg;
            app.update();
            if app.world().resource::<Events<TrackConnected>>().len() > 0 {
                connected = true;
                break;
            }
        }
        assert!(connected);

        let bridge = app.world().get::<BridgeRotation>(entity).unwrap();
        assert!((bridge.target_deg - 10.0).abs() < 0.1);
    }

    #[test]
    fn snap_audio_requests_carry_closest_distance() {
        let mut app = test_app();
        app.world_mut().spawn((
            Turntable::default(),
            BridgeRotation::default(),
            full_positive_lever(),
            TrackEndLayout {
                ends_deg: vec![90.0],
            },
        ));

        app.finish();
        app.cleanup();
        app.update();

        let events = app.world().resource::<Events<SnapAudioRequest>>();
        let request = events.iter_current_update_events().next().unwrap();
        // Target moved to 0.12; closest end is 89.88 away.
        assert!((request.closest_deg - 89.88).abs() < 0.01);
    }
}
