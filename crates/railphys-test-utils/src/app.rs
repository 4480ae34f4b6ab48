//! Bevy app builders for tests.

use bevy::prelude::*;
use railphys_core::prelude::ReworkConfig;
use railphys_core::RailphysCorePlugin;

/// A minimal app with the core plugin and default configuration.
///
/// Callers add the plugins under test, then `finish`/`cleanup`/`update`.
#[must_use]
pub fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(RailphysCorePlugin);
    app
}

/// Like [`test_app`], with an explicit configuration.
#[must_use]
pub fn test_app_with_config(config: ReworkConfig) -> App {
    let mut app = test_app();
    app.insert_resource(config);
    app
}
