//! Brake-hose venting.
//!
//! An unconnected hose end vents whenever its own angle cock is open. A
//! connected pair is sealed, except for the asymmetric case: one cock open
//! against a closed partner vents that end to atmosphere (feature-gated by
//! `brakepipe.asymmetric_venting`).

use std::collections::HashMap;

use bevy::prelude::*;
use railphys_core::prelude::ReworkConfig;

use crate::components::BrakeHose;

/// Whether a hose end vents, from its own cock and its partner's.
///
/// `partner_open` is `None` for an unconnected end.
#[must_use]
pub const fn should_vent(self_open: bool, partner_open: Option<bool>, asymmetric: bool) -> bool {
    match partner_open {
        None => self_open,
        Some(partner) => asymmetric && self_open && !partner,
    }
}

/// Recomputes the venting flag on every hose end, each tick.
///
/// Runs in [`RailphysSet::Maintain`](railphys_core::RailphysSet::Maintain).
/// A connection to a despawned partner is treated as unconnected.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn hose_vent_system(config: Res<ReworkConfig>, mut hoses: Query<(Entity, &mut BrakeHose)>) {
    let asymmetric = config.brakepipe.asymmetric_venting;

    let cocks: HashMap<Entity, bool> = hoses
        .iter()
        .map(|(entity, hose)| (entity, hose.angle_cock_open))
        .collect();

    for (entity, mut hose) in &mut hoses {
        let partner_open = hose
            .connected_to
            .and_then(|partner| cocks.get(&partner).copied());
        let venting = should_vent(hose.angle_cock_open, partner_open, asymmetric);
        if venting != hose.venting {
            hose.venting = venting;
            if config.log.brakepipe {
                debug!(
                    "hose {entity}: {}",
                    if venting { "venting" } else { "sealed" }
                );
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
    use crate::RailphysCouplingPlugin;
    use railphys_core::RailphysCorePlugin;

    #[test]
    fn vent_truth_table() {
        // Unconnected: follows own cock.
        assert!(should_vent(true, None, true));
        assert!(!should_vent(false, None, true));
        assert!(should_vent(true, None, false));

        // Connected, asymmetric enabled: open against closed vents.
        assert!(should_vent(true, Some(false), true));
        assert!(!should_vent(true, Some(true), true));
        assert!(!should_vent(false, Some(true), true));
        assert!(!should_vent(false, Some(false), true));

        // Connected, asymmetric disabled: always sealed.
        assert!(!should_vent(true, Some(false), false));
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(RailphysCorePlugin);
        app.add_plugins(RailphysCouplingPlugin);
        app
    }

    #[test]
    fn connected_pair_vents_only_the_open_side() {
        let mut app = test_app();
        let a = app.world_mut().spawn(BrakeHose::default()).id();
        let b = app.world_mut().spawn(BrakeHose::default()).id();
        {
            let mut hose_a = app.world_mut().get_mut::<BrakeHose>(a).unwrap();
            hose_a.angle_cock_open = true;
            hose_a.connected_to = Some(b);
        }
        {
            let mut hose_b = app.world_mut().get_mut::<BrakeHose>(b).unwrap();
            hose_b.connected_to = Some(a);
        }

        app.finish();
        app.cleanup();
        app.update();

        assert!(app.world().get::<BrakeHose>(a).unwrap().venting);
        assert!(!app.world().get::<BrakeHose>(b).unwrap().venting);
    }

    #[test]
    fn stale_partner_falls_back_to_unconnected_rule() {
        let mut app = test_app();
        let ghost = app.world_mut().spawn_empty().id();
        let hose = app
            .world_mut()
            .spawn(BrakeHose {
                angle_cock_open: true,
                connected_to: Some(ghost),
                venting: false,
            })
            .id();
        app.world_mut().despawn(ghost);

        app.finish();
        app.cleanup();
        app.update();

        assert!(app.world().get::<BrakeHose>(hose).unwrap().venting);
    }

    #[test]
    fn disabling_the_feature_reseals_connected_hoses() {
        let mut app = test_app();
        let a = app.world_mut().spawn(BrakeHose::default()).id();
        let b = app.world_mut().spawn(BrakeHose::default()).id();
        {
            let mut hose_a = app.world_mut().get_mut::<BrakeHose>(a).unwrap();
            hose_a.angle_cock_open = true;
            hose_a.connected_to = Some(b);
        }
        {
            let mut hose_b = app.world_mut().get_mut::<BrakeHose>(b).unwrap();
            hose_b.connected_to = Some(a);
        }

        app.finish();
        app.cleanup();
        app.update();
        assert!(app.world().get::<BrakeHose>(a).unwrap().venting);

        app.world_mut()
            .resource_mut::<ReworkConfig>()
            .brakepipe
            .asymmetric_venting = false;
        app.update();
        assert!(!app.world().get::<BrakeHose>(a).unwrap().venting);
    }
}
