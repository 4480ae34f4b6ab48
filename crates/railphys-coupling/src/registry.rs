//! Joint failure registry: joint → attached couplers, armed flag, and the
//! vanilla break thresholds captured before the model first touched them.
//!
//! Entries may outlive their joint entity. The registry itself never
//! dereferences anything; systems re-check entity liveness before using a
//! record.

use std::collections::HashMap;

use bevy::prelude::*;

/// Per-joint failure bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct JointRecord {
    /// Couplers sharing this joint, insertion order, at most two.
    couplers: Vec<Entity>,
    armed: bool,
    /// Once set, threshold maintenance pins this joint unbreakable for the
    /// rest of the session.
    pub unbreakable: bool,
    /// Set by a successful derail roll; maintenance leaves the joint's
    /// weakened thresholds alone from then on.
    pub weakened: bool,
    vanilla_break_force: f32,
    vanilla_break_torque: f32,
}

impl JointRecord {
    #[must_use]
    pub fn couplers(&self) -> &[Entity] {
        &self.couplers
    }

    #[must_use]
    pub const fn vanilla_thresholds(&self) -> (f32, f32) {
        (self.vanilla_break_force, self.vanilla_break_torque)
    }
}

/// Side table for every coupled joint the model has observed.
///
/// Owned by the coupling plugin: created at app build, cleared on session
/// teardown. All operations are total; unknown joints read as not armed.
#[derive(Resource, Debug, Default)]
pub struct JointFailureRegistry {
    records: HashMap<Entity, JointRecord>,
}

impl JointFailureRegistry {
    /// Record that `coupler` sits on `joint`, capturing the joint's current
    /// thresholds as the vanilla values on first observation.
    ///
    /// Idempotent: re-registering a known coupler changes nothing, and the
    /// vanilla thresholds are never overwritten. A joint only has two
    /// sides; further couplers are ignored.
    pub fn register(
        &mut self,
        joint: Entity,
        coupler: Entity,
        break_force: f32,
        break_torque: f32,
    ) {
        let record = self.records.entry(joint).or_insert_with(|| JointRecord {
            couplers: Vec::with_capacity(2),
            armed: false,
            unbreakable: false,
            weakened: false,
            vanilla_break_force: break_force,
            vanilla_break_torque: break_torque,
        });
        if !record.couplers.contains(&coupler) && record.couplers.len() < 2 {
            record.couplers.push(coupler);
        }
    }

    /// Whether `joint` is authorized to break on the next force event.
    /// Unknown joints are not armed.
    #[must_use]
    pub fn is_armed(&self, joint: Entity) -> bool {
        self.records.get(&joint).is_some_and(|r| r.armed)
    }

    /// Arm `joint`. No-op for unknown joints.
    pub fn arm(&mut self, joint: Entity) {
        if let Some(record) = self.records.get_mut(&joint) {
            record.armed = true;
        }
    }

    /// Disarm `joint`. Idempotent; no-op for unknown joints.
    pub fn disarm(&mut self, joint: Entity) {
        if let Some(record) = self.records.get_mut(&joint) {
            record.armed = false;
        }
    }

    #[must_use]
    pub fn get(&self, joint: Entity) -> Option<&JointRecord> {
        self.records.get(&joint)
    }

    #[must_use]
    pub fn get_mut(&mut self, joint: Entity) -> Option<&mut JointRecord> {
        self.records.get_mut(&joint)
    }

    #[must_use]
    pub fn contains(&self, joint: Entity) -> bool {
        self.records.contains_key(&joint)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record, for session teardown.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
