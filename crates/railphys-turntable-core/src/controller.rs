//! Per-tick turntable rotation controller.
//!
//! Owns the target-rotation state machine: drive ticks write a new target
//! from operator input, release triggers a one-shot snap search, and the
//! approach phase walks the target onto the matched track end under the
//! ratcheted brake profile. The physical bridge chases `target_rotation_deg`
//! outside this crate; callers feed the measured rotation back through
//! `current_rotation_deg` before each step.

use crate::angle::{angles_equal, normalize_360, normalize_signed_180, SNAP_EPSILON_DEG};
use crate::brake::brake_factor;
use crate::input::DriveInput;
use crate::snap::{closest_snap_angle, find_snap_angle, SnapTarget};

/// Base drive rate at full lever deflection, degrees per second.
pub const DRIVE_RATE_DEG_PER_SEC: f32 = 12.0;

/// Base snap-approach rate before brake scaling, degrees per second.
pub const SNAP_BASE_RATE_DEG_PER_SEC: f32 = 10.0;

/// Minimum rotation intensity reported while a snap approach is moving.
pub const SNAP_INTENSITY_FLOOR: f32 = 0.25;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the controller is in its drive/snap cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No drive and no pending approach.
    #[default]
    Idle,
    /// Operator is driving in the positive direction.
    DrivingPositive,
    /// Operator is driving in the negative direction.
    DrivingNegative,
    /// Controls just released; a snap target was found this tick.
    SearchingSnap,
    /// Walking the target onto the matched track end.
    Snapping,
    /// Approach complete, or nothing qualified to approach.
    Arrived,
}

/// Tuning knobs resolved from config once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Scales both drive and snap-approach rates.
    pub rotation_speed_multiplier: f32,
    /// Snap search window in degrees; clamped to `[0, 180]` before use.
    pub snap_tolerance_deg: f32,
    /// Whether a physical push may trigger snap detection on release.
    pub push_to_detect: bool,
}

/// What one controller step produced, for the audio/effect layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickOutcome {
    /// The target rotation moved this tick.
    pub rotated: bool,
    /// Motion this tick qualifies for the warning bell.
    pub bell_eligible: bool,
    /// The bridge aligned with its snap target this tick.
    pub track_connected: bool,
    /// Shortest distance from either bridge opening to the nearest track
    /// end, when any exist. Drives the proximity cue.
    pub snap_proximity_deg: Option<f32>,
}

// ---------------------------------------------------------------------------
// TurntableState
// ---------------------------------------------------------------------------

/// Mutable controller state for one turntable.
#[derive(Debug, Clone, PartialEq)]
pub struct TurntableState {
    /// Measured bridge rotation, written by the caller before each step.
    pub current_rotation_deg: f32,
    /// Commanded rotation the bridge chases.
    pub target_rotation_deg: f32,
    /// The bridge's own speed multiplier, captured from the scene so the
    /// vanilla value can be restored when the tweaks are disabled.
    pub speed_multiplier: f32,
    snap_target: Option<SnapTarget>,
    snap_search_done: bool,
    last_drive_direction: i8,
    last_was_push: bool,
    brake_clamp: f32,
    rotation_intensity: f32,
    phase: Phase,
}

impl TurntableState {
    #[must_use]
    pub fn new(current_rotation_deg: f32, target_rotation_deg: f32, speed_multiplier: f32) -> Self {
        Self {
            current_rotation_deg,
            target_rotation_deg,
            speed_multiplier,
            snap_target: None,
            snap_search_done: true,
            last_drive_direction: 0,
            last_was_push: false,
            brake_clamp: 1.0,
            rotation_intensity: 0.0,
            phase: Phase::Idle,
        }
    }

    /// Current phase of the drive/snap cycle.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// How hard the table is working this tick, in `[0, 1]`. Exactly zero
    /// when nothing is moving.
    #[must_use]
    pub const fn rotation_intensity(&self) -> f32 {
        self.rotation_intensity
    }

    /// The pending snap target, if an approach is in flight.
    #[must_use]
    pub const fn snap_target(&self) -> Option<SnapTarget> {
        self.snap_target
    }

    /// Advance the controller by one fixed tick of `dt` seconds.
    ///
    /// Exactly one [`TickOutcome`] is produced per call.
    pub fn step(
        &mut self,
        input: DriveInput,
        track_ends: &[f32],
        settings: &ControllerSettings,
        dt: f32,
    ) -> TickOutcome {
        if input.is_idle() {
            self.step_released(track_ends, settings, dt)
        } else {
            self.step_driven(input, track_ends, settings, dt)
        }
    }

    fn step_driven(
        &mut self,
        input: DriveInput,
        track_ends: &[f32],
        settings: &ControllerSettings,
        dt: f32,
    ) -> TickOutcome {
        let (direction, magnitude) = if input.positive > 0.0 {
            (1_i8, input.positive)
        } else {
            (-1_i8, input.negative)
        };

        let rate = DRIVE_RATE_DEG_PER_SEC
            * magnitude
            * self.speed_multiplier
            * settings.rotation_speed_multiplier;
        self.target_rotation_deg =
            normalize_360(self.target_rotation_deg + f32::from(direction) * rate * dt);

        // Driving cancels any approach in flight and re-arms the search.
        self.snap_target = None;
        self.snap_search_done = false;
        self.brake_clamp = 1.0;
        self.last_drive_direction = direction;
        self.last_was_push = input.is_push;
        self.rotation_intensity = magnitude;
        self.phase = if direction == 1 {
            Phase::DrivingPositive
        } else {
            Phase::DrivingNegative
        };

        TickOutcome {
            rotated: true,
            bell_eligible: !(input.is_push && !settings.push_to_detect),
            track_connected: false,
            snap_proximity_deg: closest_snap_angle(self.target_rotation_deg, track_ends),
        }
    }

    fn step_released(
        &mut self,
        track_ends: &[f32],
        settings: &ControllerSettings,
        dt: f32,
    ) -> TickOutcome {
        if !self.snap_search_done {
            return self.run_snap_search(track_ends, settings);
        }
        if self.snap_target.is_some() {
            return self.step_approach(track_ends, settings, dt);
        }

        // Nothing pending: coast.
        self.rotation_intensity = 0.0;
        TickOutcome::default()
    }

    /// One-shot search on the first released tick after driving.
    fn run_snap_search(&mut self, track_ends: &[f32], settings: &ControllerSettings) -> TickOutcome {
        self.snap_search_done = true;
        self.brake_clamp = 1.0;

        let was_push = std::mem::take(&mut self.last_was_push);
        let tolerance = settings.snap_tolerance_deg.clamp(0.0, 180.0);

        let eligible = tolerance > 0.0 && (!was_push || settings.push_to_detect);
        // The search window is anchored at the measured rotation, not the
        // command; a lagging bridge must not shift what qualifies.
        self.snap_target = if eligible {
            find_snap_angle(
                self.current_rotation_deg,
                track_ends,
                self.last_drive_direction,
                tolerance,
            )
        } else {
            None
        };

        if self.snap_target.is_some() {
            self.phase = Phase::SearchingSnap;
        } else {
            self.rotation_intensity = 0.0;
            self.phase = Phase::Arrived;
        }
        TickOutcome::default()
    }

    fn step_approach(
        &mut self,
        track_ends: &[f32],
        settings: &ControllerSettings,
        dt: f32,
    ) -> TickOutcome {
        let Some(target) = self.snap_target else {
            return TickOutcome::default();
        };

        // Either opening counts as arrival; the bridge is symmetric.
        let rear = normalize_360(self.current_rotation_deg + 180.0);
        if angles_equal(self.current_rotation_deg, target.angle_deg, SNAP_EPSILON_DEG)
            || angles_equal(rear, target.angle_deg, SNAP_EPSILON_DEG)
        {
            self.snap_target = None;
            self.rotation_intensity = 0.0;
            self.brake_clamp = 1.0;
            self.phase = Phase::Arrived;
            return TickOutcome {
                track_connected: true,
                ..Default::default()
            };
        }

        // Remaining distance measured against whichever opening is closer.
        let d_front = normalize_signed_180(target.angle_deg - self.target_rotation_deg);
        let d_rear = normalize_signed_180(d_front + 180.0);
        let remaining = d_front.abs().min(d_rear.abs());

        let snap_mult = (settings.rotation_speed_multiplier - 0.1).max(0.1);
        let factor = brake_factor(remaining, self.brake_clamp);
        self.brake_clamp = factor;

        let step_deg = (SNAP_BASE_RATE_DEG_PER_SEC * snap_mult * factor * dt).min(remaining);
        self.target_rotation_deg =
            normalize_360(self.target_rotation_deg + f32::from(target.direction) * step_deg);
        self.rotation_intensity = self.rotation_intensity.max(SNAP_INTENSITY_FLOOR);
        self.phase = Phase::Snapping;

        TickOutcome {
            rotated: step_deg > 0.0,
            bell_eligible: step_deg > 0.0,
            track_connected: false,
            snap_proximity_deg: closest_snap_angle(self.target_rotation_deg, track_ends),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
