//! Warning-bell scheduling and the warning-sound fallback chain.
//!
//! The controller emits a [`BellRingRequest`] for every qualifying tick of
//! motion; this module rate-limits that stream to one ring per turntable per
//! 3 s window and resolves which sound actually plays. An unavailable
//! selection falls back to the classic bell, rewriting the config value so
//! the fallback is visible to the operator.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;
use railphys_core::error::SimError;
use railphys_core::prelude::{ReworkConfig, SimTime, WarningSound};

use crate::events::{BellPlayed, BellRingRequest};

/// Minimum interval between warning rings on one turntable.
pub const BELL_RETRIGGER: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// SoundLibrary
// ---------------------------------------------------------------------------

/// Which warning sounds the host's audio layer actually has loaded.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SoundLibrary {
    available: Vec<WarningSound>,
}

impl Default for SoundLibrary {
    fn default() -> Self {
        // The classic bell ships with the base game; the horn may not.
        Self {
            available: vec![WarningSound::WarningBell],
        }
    }
}

impl SoundLibrary {
    #[must_use]
    pub fn with_sounds(available: Vec<WarningSound>) -> Self {
        Self { available }
    }

    #[must_use]
    pub fn has(&self, sound: WarningSound) -> bool {
        self.available.contains(&sound)
    }
}

// ---------------------------------------------------------------------------
// BellSchedule
// ---------------------------------------------------------------------------

/// Per-turntable re-trigger bookkeeping.
#[derive(Resource, Debug, Default)]
pub struct BellSchedule {
    next_ring: HashMap<Entity, SimTime>,
    fallback_applied: bool,
}

impl BellSchedule {
    /// Whether a ring is allowed for `turntable` at `now`.
    #[must_use]
    pub fn may_ring(&self, turntable: Entity, now: SimTime) -> bool {
        self.next_ring
            .get(&turntable)
            .map_or(true, |next| now >= *next)
    }

    /// Record a ring at `now`, opening the next window 3 s later.
    pub fn rang(&mut self, turntable: Entity, now: SimTime) {
        self.next_ring.insert(turntable, now + BELL_RETRIGGER);
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Turns [`BellRingRequest`]s into rate-limited [`BellPlayed`] events.
///
/// Runs in [`RailphysSet::Diagnose`](railphys_core::RailphysSet::Diagnose),
/// after the control step that emitted the requests. The sound fallback
/// rewrites `turntable.warning_sound` at most once per session; a missing
/// fallback sound swallows the ring with a log line.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn bell_system(
    time: Res<SimTime>,
    mut config: ResMut<ReworkConfig>,
    library: Res<SoundLibrary>,
    mut schedule: ResMut<BellSchedule>,
    mut requests: EventReader<BellRingRequest>,
    mut played: EventWriter<BellPlayed>,
) {
    for request in requests.read() {
        if !schedule.may_ring(request.turntable, *time) {
            continue;
        }

        let Some(sound) = resolve_sound(&mut config, &library, &mut schedule.fallback_applied)
        else {
            if config.log.turntable {
                debug!(
                    "turntable {}: {}",
                    request.turntable,
                    SimError::EffectUnavailable("warning sound")
                );
            }
            continue;
        };

        schedule.rang(request.turntable, *time);
        played.send(BellPlayed {
            turntable: request.turntable,
            sound,
        });
    }
}

/// Resolve the configured warning sound against the library, falling back
/// to the classic bell and rewriting the config when the selection is
/// missing. The rewrite and its warning happen at most once.
fn resolve_sound(
    config: &mut ReworkConfig,
    library: &SoundLibrary,
    fallback_applied: &mut bool,
) -> Option<WarningSound> {
    let selected = config.turntable.warning_sound;
    if library.has(selected) {
        return Some(selected);
    }

    if selected != WarningSound::WarningBell && !*fallback_applied {
        warn!("warning sound '{selected}' not in the sound library, falling back to 'warning_bell'");
        config.turntable.warning_sound = WarningSound::WarningBell;
        *fallback_applied = true;
    }
    library
        .has(WarningSound::WarningBell)
        .then_some(WarningSound::WarningBell)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RailphysTurntablePlugin;
    use railphys_core::RailphysCorePlugin;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(RailphysCorePlugin);
        app.add_plugins(RailphysTurntablePlugin);
        app
    }

    fn request(app: &mut App, turntable: Entity) {
        app.world_mut().send_event(BellRingRequest { turntable });
    }

    fn played_count(app: &mut App) -> usize {
        let count = app.world().resource::<Events<BellPlayed>>().len();
        app.world_mut().resource_mut::<Events<BellPlayed>>().clear();
        count
    }

    #[test]
    fn first_request_rings() {
        let mut app = test_app();
        let table = app.world_mut().spawn_empty().id();
        app.finish();
        app.cleanup();

        request(&mut app, table);
        app.update();
        assert_eq!(played_count(&mut app), 1);
    }

    #[test]
    fn requests_within_window_are_dropped() {
        let mut app = test_app();
        let table = app.world_mut().spawn_empty().id();
        app.finish();
        app.cleanup();

        request(&mut app, table);
        app.update();
        assert_eq!(played_count(&mut app), 1);

        // 0.02 s later: still inside the 3 s window.
        request(&mut app, table);
        app.update();
        assert_eq!(played_count(&mut app), 0);
    }

    #[test]
    fn ring_allowed_after_window_expires() {
        let mut app = test_app();
        let table = app.world_mut().spawn_empty().id();
        app.finish();
        app.cleanup();

        request(&mut app, table);
        app.update();
        assert_eq!(played_count(&mut app), 1);

        *app.world_mut().resource_mut::<SimTime>() = SimTime::from_secs(10.0);
        request(&mut app, table);
        app.update();
        assert_eq!(played_count(&mut app), 1);
    }

    #[test]
    fn turntables_are_rate_limited_independently() {
        let mut app = test_app();
        let a = app.world_mut().spawn_empty().id();
        let b = app.world_mut().spawn_empty().id();
        app.finish();
        app.cleanup();

        request(&mut app, a);
        app.update();
        assert_eq!(played_count(&mut app), 1);

        request(&mut app, b);
        app.update();
        assert_eq!(played_count(&mut app), 1);
    }

    #[test]
    fn missing_selection_falls_back_and_rewrites_config() {
        let mut app = test_app();
        let table = app.world_mut().spawn_empty().id();
        app.world_mut()
            .resource_mut::<ReworkConfig>()
            .turntable
            .warning_sound = WarningSound::ElectronicHorn;
        // Default library only has the classic bell.
        app.finish();
        app.cleanup();

        request(&mut app, table);
        app.update();

        let events = app.world().resource::<Events<BellPlayed>>();
        let event = events.iter_current_update_events().next().unwrap();
        assert_eq!(event.sound, WarningSound::WarningBell);
        assert_eq!(
            app.world().resource::<ReworkConfig>().turntable.warning_sound,
            WarningSound::WarningBell
        );
    }

    #[test]
    fn available_horn_plays_without_fallback() {
        let mut app = test_app();
        let table = app.world_mut().spawn_empty().id();
        app.insert_resource(SoundLibrary::with_sounds(vec![
            WarningSound::WarningBell,
            WarningSound::ElectronicHorn,
        ]));
        app.world_mut()
            .resource_mut::<ReworkConfig>()
            .turntable
            .warning_sound = WarningSound::ElectronicHorn;
        app.finish();
        app.cleanup();

        request(&mut app, table);
        app.update();

        let events = app.world().resource::<Events<BellPlayed>>();
        let event = events.iter_current_update_events().next().unwrap();
        assert_eq!(event.sound, WarningSound::ElectronicHorn);
        assert_eq!(
            app.world().resource::<ReworkConfig>().turntable.warning_sound,
            WarningSound::ElectronicHorn
        );
    }

    #[test]
    fn empty_library_swallows_rings() {
        let mut app = test_app();
        let table = app.world_mut().spawn_empty().id();
        app.insert_resource(SoundLibrary::with_sounds(vec![]));
        app.finish();
        app.cleanup();

        request(&mut app, table);
        app.update();
        assert_eq!(played_count(&mut app), 0);
    }
}
