//! Read-side helpers for asserting on harness state.

use bevy::prelude::*;

use crate::block::{Block, TileEntity};
use crate::craft::Craft;
use crate::messages::MessageLog;
use crate::multiblock::MultiblockRegistry;
use crate::riders::Pose;
use crate::world::{Universe, WorldId};

use super::TestShipyard;

impl TestShipyard {
    pub fn block(&self, world: WorldId, pos: IVec3) -> Block {
        self.world_ref()
            .resource::<Universe>()
            .world(world)
            .map(|w| w.block_at(pos))
            .unwrap_or(Block::Air)
    }

    pub fn block_count(&self, world: WorldId) -> usize {
        self.world_ref()
            .resource::<Universe>()
            .world(world)
            .map(|w| w.block_count())
            .unwrap_or(0)
    }

    pub fn tile(&self, world: WorldId, pos: IVec3) -> Option<TileEntity> {
        self.world_ref()
            .resource::<Universe>()
            .world(world)
            .and_then(|w| w.tile_at(pos).cloned())
    }

    pub fn craft(&self, entity: Entity) -> &Craft {
        self.world_ref().get::<Craft>(entity).expect("craft entity")
    }

    pub fn pose(&self, entity: Entity) -> Pose {
        *self.world_ref().get::<Pose>(entity).expect("pose entity")
    }

    pub fn registry(&self) -> &MultiblockRegistry {
        self.world_ref().resource::<MultiblockRegistry>()
    }

    /// Every chat line delivered to `actor` so far, in order.
    pub fn messages_for(&self, actor: Entity) -> Vec<String> {
        self.world_ref()
            .resource::<MessageLog>()
            .for_actor(actor)
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    fn world_ref(&self) -> &World {
        // App::world() needs &self only; named to avoid clashing with the
        // voxel-world accessors above.
        self.app_ref().world()
    }

    fn app_ref(&self) -> &App {
        &self.app
    }
}
