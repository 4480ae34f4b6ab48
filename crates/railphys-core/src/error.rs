use thiserror::Error;

/// Top-level error type for railphys-core.
#[derive(Debug, Error)]
pub enum RailphysError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
}

/// Configuration errors. Only hard constraint violations end up here;
/// soft out-of-range values are clamped by accessors instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid physics_dt: {0} (must be > 0)")]
    InvalidPhysicsDt(f64),

    #[error("Invalid custom_break_force: {0} (must be > 0)")]
    InvalidBreakForce(f32),
}

/// Per-tick degradation causes. None of these abort a tick; they are
/// logged and the tick becomes a no-op for the affected object.
///
/// Copy + static shape for cheap construction in hot paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),

    #[error("Stale reference: {0} no longer exists")]
    StaleReference(&'static str),

    #[error("Effect unavailable: {0}")]
    EffectUnavailable(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn railphys_error_from_config_error() {
        let err = ConfigError::InvalidPhysicsDt(-1.0);
        let top: RailphysError = err.into();
        assert!(matches!(top, RailphysError::Config(_)));
        assert!(top.to_string().contains("-1"));
    }

    #[test]
    fn railphys_error_from_sim_error() {
        let err = SimError::MissingDependency("turntable lever");
        let top: RailphysError = err.into();
        assert!(matches!(top, RailphysError::Sim(_)));
        assert!(top.to_string().contains("lever"));
    }

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfigError = io_err.into();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn sim_error_is_copy() {
        let err = SimError::StaleReference("coupler joint");
        let err2 = err;
        assert_eq!(err, err2);
    }

    #[test]
    fn sim_error_display_messages() {
        assert_eq!(
            SimError::MissingDependency("track layout").to_string(),
            "Missing dependency: track layout"
        );
        assert_eq!(
            SimError::StaleReference("joint").to_string(),
            "Stale reference: joint no longer exists"
        );
        assert_eq!(
            SimError::EffectUnavailable("warning sound").to_string(),
            "Effect unavailable: warning sound"
        );
    }
}
