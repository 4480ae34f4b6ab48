//! Shared helpers for railphys tests.

pub mod app;
pub mod rng;

pub mod prelude {
    pub use crate::app::{test_app, test_app_with_config};
    pub use crate::rng::seeded_rng;
}
