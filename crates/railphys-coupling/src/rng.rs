//! Seeded RNG streams for the failure rolls.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use railphys_core::prelude::ReworkConfig;
use railphys_core::seed::derive_seed;

/// Independent RNG streams for stress arming and derail rolls, both derived
/// from the config's root seed so a session's failure pattern replays.
#[derive(Resource, Debug, Clone)]
pub struct FailureRng {
    pub stress: ChaCha8Rng,
    pub derail: ChaCha8Rng,
}

impl FailureRng {
    #[must_use]
    pub fn from_root_seed(seed: u64) -> Self {
        Self {
            stress: ChaCha8Rng::seed_from_u64(derive_seed(seed, "stress")),
            derail: ChaCha8Rng::seed_from_u64(derive_seed(seed, "derail")),
        }
    }
}

impl FromWorld for FailureRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world.get_resource::<ReworkConfig>().map_or(0, |c| c.seed);
        Self::from_root_seed(seed)
    }
}
