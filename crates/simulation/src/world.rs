//! The voxel world collaborator: sparse block storage per world instance,
//! tile entities keyed by voxel, dirty-region tracking, and the observer
//! notification queue.
//!
//! `set_block_fast` is the craft-transform write path: it skips physics and
//! update propagation entirely (there is none here by construction) but still
//! queues a `BlockChanged` for observers and marks the containing region
//! dirty for persistence.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::block::{Block, TileEntity};
use crate::config::REGION_SHIFT;

/// Identifies one world instance. Crafts can move between worlds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// The region (16^3 cube) containing a voxel.
#[inline]
pub fn region_of(pos: IVec3) -> IVec3 {
    IVec3::new(
        pos.x >> REGION_SHIFT,
        pos.y >> REGION_SHIFT,
        pos.z >> REGION_SHIFT,
    )
}

/// A single observed block write, drained into `BlockChanged` events.
#[derive(Debug, Clone, Copy)]
pub struct BlockChange {
    pub world: WorldId,
    pub pos: IVec3,
    pub old: Block,
    pub new: Block,
}

/// Event fired for every effective block write, after the write has landed.
#[derive(Event, Debug, Clone, Copy)]
pub struct BlockChanged {
    pub world: WorldId,
    pub pos: IVec3,
    pub old: Block,
    pub new: Block,
}

/// One world instance: a sparse voxel grid plus its tile entities.
#[derive(Default)]
pub struct VoxelWorld {
    id: WorldId,
    blocks: HashMap<IVec3, Block>,
    tiles: HashMap<IVec3, TileEntity>,
    /// Regions with unsaved modifications.
    pub dirty_regions: HashSet<IVec3>,
    /// Writes not yet delivered to observers.
    pending_updates: Vec<BlockChange>,
}

impl VoxelWorld {
    pub fn new(id: WorldId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    /// The block state at `pos`. Unset voxels are air.
    pub fn block_at(&self, pos: IVec3) -> Block {
        self.blocks.get(&pos).copied().unwrap_or(Block::Air)
    }

    /// Fast block write: no-op when the state is already `block`, otherwise
    /// store, queue the observer notification, and dirty the region.
    pub fn set_block_fast(&mut self, pos: IVec3, block: Block) {
        let old = self.block_at(pos);
        if old == block {
            return;
        }
        if block.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
        self.pending_updates.push(BlockChange {
            world: self.id,
            pos,
            old,
            new: block,
        });
        self.dirty_regions.insert(region_of(pos));
    }

    pub fn tile_at(&self, pos: IVec3) -> Option<&TileEntity> {
        self.tiles.get(&pos)
    }

    /// Remove and return the tile entity bound to `pos`, if any.
    pub fn detach_tile(&mut self, pos: IVec3) -> Option<TileEntity> {
        self.tiles.remove(&pos)
    }

    /// Bind `tile` to its own `pos`. Replaces any tile already there.
    pub fn attach_tile(&mut self, tile: TileEntity) {
        self.tiles.insert(tile.pos, tile);
    }

    /// Number of non-air voxels. Test and diagnostics helper.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn take_updates(&mut self) -> Vec<BlockChange> {
        std::mem::take(&mut self.pending_updates)
    }
}

/// All live world instances.
#[derive(Resource, Default)]
pub struct Universe {
    worlds: HashMap<WorldId, VoxelWorld>,
}

impl Universe {
    /// Create (or return the existing) world `id`.
    pub fn ensure_world(&mut self, id: WorldId) -> &mut VoxelWorld {
        self.worlds.entry(id).or_insert_with(|| VoxelWorld::new(id))
    }

    pub fn world(&self, id: WorldId) -> Option<&VoxelWorld> {
        self.worlds.get(&id)
    }

    pub fn world_mut(&mut self, id: WorldId) -> Option<&mut VoxelWorld> {
        self.worlds.get_mut(&id)
    }
}

/// Drain every world's pending writes into `BlockChanged` events.
pub fn flush_block_updates(
    mut universe: ResMut<Universe>,
    mut changed: EventWriter<BlockChanged>,
) {
    for world in universe.worlds.values_mut() {
        for change in world.take_updates() {
            changed.send(BlockChanged {
                world: change.world,
                pos: change.pos,
                old: change.old,
                new: change.new,
            });
        }
    }
}

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Universe>()
            .add_event::<BlockChanged>()
            .add_systems(Update, flush_block_updates);
    }
}
