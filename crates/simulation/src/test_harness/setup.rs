//! Builder and action methods for world layout and craft operations.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::block::{Block, TileEntity};
use crate::config::DetectionConfig;
use crate::craft::Craft;
use crate::detection::DetectCraftRequest;
use crate::multiblock::{MultiblockId, MultiblockKind, MultiblockRegistry};
use crate::riders::{Player, Pose};
use crate::rotation::Rotation;
use crate::transform::{MoveCraftRequest, RotateCraftRequest};
use crate::world::{Universe, WorldId};

use super::TestShipyard;

impl TestShipyard {
    // -----------------------------------------------------------------------
    // World layout
    // -----------------------------------------------------------------------

    pub fn with_world(mut self, id: WorldId) -> Self {
        self.app
            .world_mut()
            .resource_mut::<Universe>()
            .ensure_world(id);
        self
    }

    pub fn with_block(mut self, world: WorldId, pos: IVec3, block: Block) -> Self {
        self.set_block(world, pos, block);
        self
    }

    /// Fill the inclusive cuboid [min, max] with `block`.
    pub fn with_cuboid(mut self, world: WorldId, min: IVec3, max: IVec3, block: Block) -> Self {
        {
            let mut universe = self.app.world_mut().resource_mut::<Universe>();
            let voxels = universe.ensure_world(world);
            for x in min.x..=max.x {
                for y in min.y..=max.y {
                    for z in min.z..=max.z {
                        voxels.set_block_fast(IVec3::new(x, y, z), block);
                    }
                }
            }
        }
        self
    }

    pub fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.app
            .world_mut()
            .resource_mut::<DetectionConfig>()
            .size_limit = size_limit;
        self
    }

    pub fn set_block(&mut self, world: WorldId, pos: IVec3, block: Block) {
        let mut universe = self.app.world_mut().resource_mut::<Universe>();
        universe.ensure_world(world).set_block_fast(pos, block);
    }

    pub fn attach_tile(&mut self, world: WorldId, tile: TileEntity) {
        let mut universe = self.app.world_mut().resource_mut::<Universe>();
        universe.ensure_world(world).attach_tile(tile);
    }

    pub fn place_multiblock(
        &mut self,
        kind: MultiblockKind,
        origin: IVec3,
        world: WorldId,
    ) -> MultiblockId {
        self.app
            .world_mut()
            .resource_mut::<MultiblockRegistry>()
            .place(kind, origin, world)
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    pub fn spawn_player(&mut self, position: DVec3, world: WorldId) -> Entity {
        self.app
            .world_mut()
            .spawn((Player, Pose::at(position, world)))
            .id()
    }

    /// A non-player rider (an ox, a crate with legs, whatever).
    pub fn spawn_rider(&mut self, position: DVec3, world: WorldId) -> Entity {
        self.app.world_mut().spawn(Pose::at(position, world)).id()
    }

    pub fn spawn_craft(&mut self, origin: IVec3, world: WorldId, owner: Entity) -> Entity {
        self.app
            .world_mut()
            .spawn(Craft::new(origin, world, owner))
            .id()
    }

    pub fn board(&mut self, craft: Entity, rider: Entity) {
        let mut entry = self.app.world_mut().entity_mut(craft);
        let mut component = entry.get_mut::<Craft>().expect("craft entity");
        component.passengers.push(rider);
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    pub fn detect(&mut self, craft: Entity) {
        self.app.world_mut().send_event(DetectCraftRequest { craft });
        self.tick();
    }

    pub fn move_craft(&mut self, craft: Entity, offset: IVec3) {
        self.app.world_mut().send_event(MoveCraftRequest {
            craft,
            offset,
            target_world: None,
        });
        self.tick();
    }

    pub fn move_craft_to_world(&mut self, craft: Entity, offset: IVec3, world: WorldId) {
        self.app.world_mut().send_event(MoveCraftRequest {
            craft,
            offset,
            target_world: Some(world),
        });
        self.tick();
    }

    pub fn rotate_craft(&mut self, craft: Entity, rotation: Rotation) {
        self.app
            .world_mut()
            .send_event(RotateCraftRequest { craft, rotation });
        self.tick();
    }
}
