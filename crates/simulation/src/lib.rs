//! Craft simulation: player-controlled movable voxel structures ("crafts")
//! inside large mutable voxel worlds.
//!
//! The subsystem covers three operations on a craft: detecting which voxels
//! belong to it (a bounded flood fill), deriving an approximate solid hitbox
//! from the detected shell, and relocating/rotating its blocks, tile
//! entities, multiblocks, and riders as one all-or-nothing transaction
//! against the live world.
//!
//! Everything is headless: `SimulationPlugin` on top of `MinimalPlugins` is a
//! complete deployment.

use bevy::prelude::*;

pub mod block;
pub mod config;
pub mod craft;
pub mod detection;
pub mod messages;
pub mod multiblock;
pub mod riders;
pub mod rotation;
pub mod transform;
pub mod world;

#[cfg(test)]
pub mod test_harness;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<config::DetectionConfig>();

        app.add_plugins((
            world::WorldPlugin,
            messages::MessagesPlugin,
            multiblock::MultiblockPlugin,
            detection::DetectionPlugin,
            transform::TransformPlugin,
        ));
    }
}
