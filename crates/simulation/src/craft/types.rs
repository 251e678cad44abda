use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::multiblock::MultiblockId;
use crate::world::WorldId;

/// A voxel coordinate relative to a craft's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginRelative {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl OriginRelative {
    pub fn of(pos: IVec3, origin: IVec3) -> Self {
        let rel = pos - origin;
        Self {
            x: rel.x,
            y: rel.y,
            z: rel.z,
        }
    }
}

/// A movable voxel structure, exclusively owned by the session that created
/// it. Populated by detection, mutated in place by move/rotate; construction
/// and destruction belong to the controlling session.
#[derive(Component)]
pub struct Craft {
    /// The craft's reference voxel. Mapped forward under every transform.
    pub origin: IVec3,
    /// Which world instance the craft's blocks currently live in.
    pub world: WorldId,
    /// Controlling actor, for messaging and permissions only.
    pub owner: Entity,
    /// Authoritative record of which voxels belong to this craft.
    pub detected_blocks: HashSet<IVec3>,
    /// Approximate solid volume, origin-relative. Superset of the relative
    /// projections of `detected_blocks`; filled downward per column so hollow
    /// interiors still count as "inside".
    pub bounds: HashSet<OriginRelative>,
    /// Non-owning handles into the multiblock registry. May dangle; every
    /// consumer skips dead handles silently.
    pub multiblocks: Vec<MultiblockId>,
    /// Entities currently riding the craft.
    pub passengers: Vec<Entity>,
}

impl Craft {
    pub fn new(origin: IVec3, world: WorldId, owner: Entity) -> Self {
        Self {
            origin,
            world,
            owner,
            detected_blocks: HashSet::new(),
            bounds: HashSet::new(),
            multiblocks: Vec::new(),
            passengers: Vec::new(),
        }
    }

    pub fn block_count(&self) -> usize {
        self.detected_blocks.len()
    }

    /// Whether `pos` counts as inside this craft: an exactly detected block,
    /// or anywhere in the approximate hitbox. The hitbox test is deliberately
    /// a cheap superset check.
    pub fn contains(&self, pos: IVec3) -> bool {
        self.detected_blocks.contains(&pos)
            || self.bounds.contains(&OriginRelative::of(pos, self.origin))
    }

    /// Rebuild `bounds` from the current detected set. Called after detection
    /// and after every rotation; a rotated per-column fill is not the same as
    /// a per-column fill of the rotated blocks, so it is never rotated in
    /// place.
    pub fn recalculate_hitbox(&mut self) {
        self.bounds.clear();
        super::calculate_hitbox(&self.detected_blocks, self.origin, &mut self.bounds);
    }
}
