//! ECS components for cars, couplers, joints, and brake hoses.
//!
//! These mirror the host simulation's coupling graph: a [`TrainCar`] owns up
//! to two [`Coupler`]s, a coupled pair of couplers shares one
//! [`CouplerJoint`] entity whose break thresholds the failure model writes.

use bevy::prelude::*;

/// Break threshold meaning "this joint cannot break".
pub const UNBREAKABLE_FORCE: f32 = f32::INFINITY;

/// Minimum breakable threshold: the joint fails on the next applied force.
pub const MIN_BREAK_FORCE: f32 = 1.0;

// ---------------------------------------------------------------------------
// TrainCar
// ---------------------------------------------------------------------------

/// A rail vehicle participating in consist enumeration.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct TrainCar {
    /// Host-side identifier, used in diagnostics only.
    pub car_id: String,
    pub is_loco: bool,
}

// ---------------------------------------------------------------------------
// Coupler
// ---------------------------------------------------------------------------

/// Mechanical state of one coupler head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CouplerState {
    /// Stowed against the car; not participating in coupling at all.
    Parked,
    /// Hanging free, ready to couple.
    #[default]
    Dangling,
    /// Coupled with slack in the chain. The only state where stress
    /// failure can occur.
    AttachedLoose,
    /// Coupled and screwed tight.
    AttachedTight,
    /// Transitional: being screwed from loose toward tight.
    TighteningCouple,
    /// Transitional: being unscrewed toward uncoupling.
    LooseningUncouple,
    /// Transitional: host is resolving the next stable state.
    DetermineNextState,
}

impl CouplerState {
    /// Loose or tight attached, the states a derailment can tear apart.
    #[must_use]
    pub const fn is_attached(self) -> bool {
        matches!(self, Self::AttachedLoose | Self::AttachedTight)
    }
}

/// One coupler head on a car.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Coupler {
    /// The car this coupler belongs to.
    pub car: Entity,
    pub state: CouplerState,
    /// Joint entity shared with the partner coupler while coupled.
    pub joint: Option<Entity>,
}

impl Coupler {
    #[must_use]
    pub const fn new(car: Entity) -> Self {
        Self {
            car,
            state: CouplerState::Dangling,
            joint: None,
        }
    }

    #[must_use]
    pub const fn is_coupled(&self) -> bool {
        self.joint.is_some()
    }
}

// ---------------------------------------------------------------------------
// CouplerJoint
// ---------------------------------------------------------------------------

/// The physical joint between two coupled couplers.
///
/// The host breaks the joint when applied force exceeds these thresholds;
/// the failure model only ever writes them.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CouplerJoint {
    pub break_force: f32,
    pub break_torque: f32,
}

impl CouplerJoint {
    #[must_use]
    pub const fn new(break_force: f32, break_torque: f32) -> Self {
        Self {
            break_force,
            break_torque,
        }
    }

    /// Set both thresholds at once.
    pub fn set_thresholds(&mut self, force: f32, torque: f32) {
        self.break_force = force;
        self.break_torque = torque;
    }
}

// ---------------------------------------------------------------------------
// BrakeHose
// ---------------------------------------------------------------------------

/// One end of a brake pipe hose, with its angle cock.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrakeHose {
    pub angle_cock_open: bool,
    /// The partner hose end, while connected.
    pub connected_to: Option<Entity>,
    /// Whether this end is venting to atmosphere, written each tick.
    pub venting: bool,
}

impl Default for BrakeHose {
    fn default() -> Self {
        Self {
            angle_cock_open: false,
            connected_to: None,
            venting: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
