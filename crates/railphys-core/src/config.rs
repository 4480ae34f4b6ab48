use std::fmt;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}
const fn default_rotation_speed_multiplier() -> f32 {
    0.5
}
const fn default_snap_tolerance_deg() -> f32 {
    20.0
}
const fn default_derail_break_chance() -> f32 {
    0.5
}
const fn default_stress_break_chance() -> f32 {
    0.35
}
const fn default_custom_break_force() -> f32 {
    1_000_000.0
}
const fn default_physics_dt() -> f64 {
    0.02
}

// ---------------------------------------------------------------------------
// WarningSound
// ---------------------------------------------------------------------------

/// Which warning sound a moving turntable plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSound {
    /// Classic mechanical warning bell. Always available; the fallback.
    #[default]
    WarningBell,
    /// Modern electronic horn. May be absent from the host sound library.
    ElectronicHorn,
}

impl fmt::Display for WarningSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WarningBell => write!(f, "warning_bell"),
            Self::ElectronicHorn => write!(f, "electronic_horn"),
        }
    }
}

// ---------------------------------------------------------------------------
// TurntableConfig
// ---------------------------------------------------------------------------

/// Turntable rotation and snap-detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurntableConfig {
    /// Master switch for the turntable rework. When off, the original speed
    /// multiplier is restored and the vanilla controller runs untouched.
    #[serde(default = "default_true")]
    pub enable_tweaks: bool,

    /// Allow snap-angle detection after the table was pushed by hand rather
    /// than driven by its lever.
    #[serde(default)]
    pub push_to_detect: bool,

    /// Scales the turntable's own drive speed (default: 0.5).
    #[serde(default = "default_rotation_speed_multiplier")]
    pub rotation_speed_multiplier: f32,

    /// Track-end detection window in degrees. 0 disables detection,
    /// 180 always finds the next track. Clamped via [`snap_tolerance`](Self::snap_tolerance).
    #[serde(default = "default_snap_tolerance_deg")]
    pub snap_tolerance_deg: f32,

    /// Selected warning sound while the table rotates.
    #[serde(default)]
    pub warning_sound: WarningSound,
}

impl Default for TurntableConfig {
    fn default() -> Self {
        Self {
            enable_tweaks: true,
            push_to_detect: false,
            rotation_speed_multiplier: default_rotation_speed_multiplier(),
            snap_tolerance_deg: default_snap_tolerance_deg(),
            warning_sound: WarningSound::default(),
        }
    }
}

impl TurntableConfig {
    /// Snap tolerance clamped to the valid [0, 180] window.
    ///
    /// Out-of-range values are clamped, never rejected.
    #[must_use]
    pub fn snap_tolerance(&self) -> f32 {
        self.snap_tolerance_deg.clamp(0.0, 180.0)
    }
}

// ---------------------------------------------------------------------------
// CouplingConfig
// ---------------------------------------------------------------------------

/// Coupler failure settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingConfig {
    /// Master switch for coupler failure simulation.
    #[serde(default = "default_true")]
    pub enable_failure: bool,

    /// Per-coupler chance to fail when the vehicle derails (clamped to [0, 1]).
    #[serde(default = "default_derail_break_chance")]
    pub derail_break_chance: f32,

    /// Per-joint chance, rolled on consist refresh, to arm the joint for
    /// stress failure (clamped to [0, 1]). 0 makes joints unbreakable.
    #[serde(default = "default_stress_break_chance")]
    pub stress_break_chance: f32,

    /// Break force/torque (N) applied to armed joints (default: 1 000 kN).
    #[serde(default = "default_custom_break_force")]
    pub custom_break_force: f32,
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            enable_failure: true,
            derail_break_chance: default_derail_break_chance(),
            stress_break_chance: default_stress_break_chance(),
            custom_break_force: default_custom_break_force(),
        }
    }
}

impl CouplingConfig {
    /// Derail failure probability clamped to [0, 1].
    #[must_use]
    pub fn derail_chance(&self) -> f32 {
        self.derail_break_chance.clamp(0.0, 1.0)
    }

    /// Stress failure probability clamped to [0, 1].
    #[must_use]
    pub fn stress_chance(&self) -> f32 {
        self.stress_break_chance.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// BrakepipeConfig
// ---------------------------------------------------------------------------

/// Brake pipe settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrakepipeConfig {
    /// Vent the pipe when one angle cock is open and the partner's is closed.
    #[serde(default = "default_true")]
    pub asymmetric_venting: bool,
}

impl Default for BrakepipeConfig {
    fn default() -> Self {
        Self {
            asymmetric_venting: true,
        }
    }
}

// ---------------------------------------------------------------------------
// LogChannels
// ---------------------------------------------------------------------------

/// Per-channel diagnostic log switches. All off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogChannels {
    #[serde(default)]
    pub turntable: bool,
    #[serde(default)]
    pub brakepipe: bool,
    #[serde(default)]
    pub derail: bool,
    #[serde(default)]
    pub coupler: bool,
}

// ---------------------------------------------------------------------------
// ReworkConfig
// ---------------------------------------------------------------------------

/// Complete rework configuration, loaded from TOML.
///
/// Read as an immutable-per-tick snapshot by every system. The single
/// exception is the warning-sound fallback, which rewrites
/// `turntable.warning_sound` when the selected sound is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct ReworkConfig {
    #[serde(default)]
    pub turntable: TurntableConfig,
    #[serde(default)]
    pub coupling: CouplingConfig,
    #[serde(default)]
    pub brakepipe: BrakepipeConfig,
    #[serde(default)]
    pub log: LogChannels,

    /// Root seed for all failure rolls.
    #[serde(default)]
    pub seed: u64,

    /// Fixed physics timestep in seconds (default: 0.02 = 50 Hz).
    #[serde(default = "default_physics_dt")]
    pub physics_dt: f64,
}

impl Default for ReworkConfig {
    fn default() -> Self {
        Self {
            turntable: TurntableConfig::default(),
            coupling: CouplingConfig::default(),
            brakepipe: BrakepipeConfig::default(),
            log: LogChannels::default(),
            seed: 0,
            physics_dt: default_physics_dt(),
        }
    }
}

impl ReworkConfig {
    /// Validate hard constraints. Soft out-of-range values (tolerance,
    /// probabilities) are clamped by accessors instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.physics_dt <= 0.0 {
            return Err(ConfigError::InvalidPhysicsDt(self.physics_dt));
        }
        if self.coupling.custom_break_force <= 0.0 {
            return Err(ConfigError::InvalidBreakForce(
                self.coupling.custom_break_force,
            ));
        }
        Ok(())
    }

    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Defaults ----

    #[test]
    fn default_values_match_shipped_settings() {
        let cfg = ReworkConfig::default();
        assert!(cfg.turntable.enable_tweaks);
        assert!(!cfg.turntable.push_to_detect);
        assert!((cfg.turntable.rotation_speed_multiplier - 0.5).abs() < f32::EPSILON);
        assert!((cfg.turntable.snap_tolerance_deg - 20.0).abs() < f32::EPSILON);
        assert_eq!(cfg.turntable.warning_sound, WarningSound::WarningBell);
        assert!(cfg.coupling.enable_failure);
        assert!((cfg.coupling.derail_break_chance - 0.5).abs() < f32::EPSILON);
        assert!((cfg.coupling.stress_break_chance - 0.35).abs() < f32::EPSILON);
        assert!((cfg.coupling.custom_break_force - 1_000_000.0).abs() < f32::EPSILON);
        assert!(cfg.brakepipe.asymmetric_venting);
        assert!(!cfg.log.turntable);
        assert_eq!(cfg.seed, 0);
        assert!((cfg.physics_dt - 0.02).abs() < f64::EPSILON);
    }

    // ---- Clamped accessors ----

    #[test]
    fn snap_tolerance_clamps_to_valid_window() {
        let mut cfg = TurntableConfig::default();
        cfg.snap_tolerance_deg = -5.0;
        assert!(cfg.snap_tolerance().abs() < f32::EPSILON);
        cfg.snap_tolerance_deg = 400.0;
        assert!((cfg.snap_tolerance() - 180.0).abs() < f32::EPSILON);
        cfg.snap_tolerance_deg = 90.0;
        assert!((cfg.snap_tolerance() - 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn probabilities_clamp_to_unit_interval() {
        let mut cfg = CouplingConfig::default();
        cfg.derail_break_chance = 1.5;
        cfg.stress_break_chance = -0.2;
        assert!((cfg.derail_chance() - 1.0).abs() < f32::EPSILON);
        assert!(cfg.stress_chance().abs() < f32::EPSILON);
    }

    // ---- Validation ----

    #[test]
    fn validate_ok_on_defaults() {
        assert!(ReworkConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_physics_dt() {
        let cfg = ReworkConfig {
            physics_dt: 0.0,
            ..ReworkConfig::default()
        };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidPhysicsDt(_)
        ));
    }

    #[test]
    fn validate_rejects_bad_break_force() {
        let mut cfg = ReworkConfig::default();
        cfg.coupling.custom_break_force = -1.0;
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidBreakForce(_)
        ));
    }

    // ---- TOML ----

    #[test]
    fn toml_roundtrip_with_overrides() {
        let toml_str = r#"
            seed = 42
            physics_dt = 0.01

            [turntable]
            enable_tweaks = false
            rotation_speed_multiplier = 1.0
            snap_tolerance_deg = 10.0
            warning_sound = "electronic_horn"

            [coupling]
            stress_break_chance = 0.1

            [log]
            coupler = true
        "#;
        let cfg: ReworkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.seed, 42);
        assert!((cfg.physics_dt - 0.01).abs() < f64::EPSILON);
        assert!(!cfg.turntable.enable_tweaks);
        assert!((cfg.turntable.rotation_speed_multiplier - 1.0).abs() < f32::EPSILON);
        assert_eq!(cfg.turntable.warning_sound, WarningSound::ElectronicHorn);
        assert!((cfg.coupling.stress_break_chance - 0.1).abs() < f32::EPSILON);
        // Untouched sections keep their defaults.
        assert!((cfg.coupling.derail_break_chance - 0.5).abs() < f32::EPSILON);
        assert!(cfg.log.coupler);
        assert!(!cfg.log.turntable);
    }

    #[test]
    fn toml_empty_uses_defaults() {
        let cfg: ReworkConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, ReworkConfig::default());
    }

    #[test]
    fn from_file_rejects_invalid() {
        let dir = std::env::temp_dir().join("railphys_test_config_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "physics_dt = -0.5\n").unwrap();

        assert!(ReworkConfig::from_file(&path).is_err());

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn json_roundtrip_preserves_config() {
        let mut cfg = ReworkConfig::default();
        cfg.turntable.warning_sound = WarningSound::ElectronicHorn;
        cfg.coupling.stress_break_chance = 0.75;
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ReworkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn warning_sound_display() {
        assert_eq!(WarningSound::WarningBell.to_string(), "warning_bell");
        assert_eq!(WarningSound::ElectronicHorn.to_string(), "electronic_horn");
    }
}
