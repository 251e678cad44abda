//! Rider transport. Blocks snap to voxel boundaries but riders occupy
//! continuous space, so rider motion deliberately does not reuse the block
//! coordinate mapping for quarter turns: it rotates about the voxel-center
//! offset of the craft origin instead. Rotating about the raw origin point
//! compounds positional drift, leaving riders off-center after a few turns.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::rotation::{rotate_by, Rotation};
use crate::world::WorldId;

/// A rider's continuous pose: position plus view angles.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: DVec3,
    pub world: WorldId,
    pub yaw: f32,
    pub pitch: f32,
}

impl Pose {
    pub fn at(position: DVec3, world: WorldId) -> Self {
        Self {
            position,
            world,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

/// Marker for player-like riders: they get full pose transport (view angles
/// and cross-world teleport); unmarked riders get position-only transport.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Where a rider at `position` ends up under a craft transform.
///
/// Quarter turns rotate about `origin`'s voxel center (+0.5, 0, +0.5); every
/// other transform applies the block mapping directly. A combined
/// translate-plus-quarter-turn therefore does NOT compose for riders — the
/// translation component is dropped. No current operation issues one; the
/// asymmetry is guarded by tests rather than papered over.
pub fn rider_destination(
    position: DVec3,
    origin: IVec3,
    rotation: Rotation,
    mapping: impl Fn(DVec3) -> DVec3,
) -> DVec3 {
    if rotation.is_quarter_turn() {
        let pivot = origin.as_dvec3() + DVec3::new(0.5, 0.0, 0.5);
        rotate_by(position, pivot, rotation)
    } else {
        mapping(position)
    }
}

/// Apply a craft transform to one rider's pose.
pub fn transport_rider(
    pose: &mut Pose,
    is_player: bool,
    origin: IVec3,
    rotation: Rotation,
    target_world: WorldId,
    mapping: impl Fn(DVec3) -> DVec3,
) {
    pose.position = rider_destination(pose.position, origin, rotation, mapping);
    if is_player {
        pose.yaw += rotation.as_degrees() as f32;
        pose.world = target_world;
    }
    // Non-player riders cannot change worlds; their position still moves.
}
