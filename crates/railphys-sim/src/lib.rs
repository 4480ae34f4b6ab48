//! railphys-sim: one plugin for the whole physics rework.
//!
//! ```
//! use bevy::prelude::*;
//! use railphys_sim::prelude::*;
//!
//! let mut app = App::new();
//! app.add_plugins(RailphysSimPlugin::default());
//! app.finish();
//! app.cleanup();
//! app.update();
//! ```

use bevy::prelude::*;
use railphys_core::prelude::ReworkConfig;
use railphys_core::RailphysCorePlugin;
use railphys_coupling::RailphysCouplingPlugin;
use railphys_turntable::RailphysTurntablePlugin;

/// Adds the core ordering, turntable control, and coupler failure plugins.
///
/// With a [`ReworkConfig`], that configuration is installed before the
/// plugins build; otherwise defaults apply.
#[derive(Default)]
pub struct RailphysSimPlugin {
    pub config: Option<ReworkConfig>,
}

impl RailphysSimPlugin {
    #[must_use]
    pub fn with_config(config: ReworkConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Plugin for RailphysSimPlugin {
    fn build(&self, app: &mut App) {
        if let Some(config) = &self.config {
            app.insert_resource(config.clone());
        }
        app.add_plugins((
            RailphysCorePlugin,
            RailphysTurntablePlugin,
            RailphysCouplingPlugin,
        ));
    }
}

pub mod prelude {
    pub use crate::RailphysSimPlugin;
    pub use railphys_core::prelude::*;
    pub use railphys_coupling::prelude::*;
    pub use railphys_turntable::prelude::*;
    pub use railphys_turntable_core::prelude::*;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
