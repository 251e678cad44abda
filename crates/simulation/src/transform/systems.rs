use bevy::ecs::query::Has;
use bevy::math::DVec3;
use bevy::prelude::*;

use crate::craft::Craft;
use crate::messages::{deliver_chat_messages, ChatMessage};
use crate::multiblock::MultiblockRegistry;
use crate::riders::{transport_rider, Player, Pose};
use crate::rotation::{rotate_by, Rotation};
use crate::world::{flush_block_updates, Universe, WorldId};

use super::engine::{change, TransformError, TransformReport};

/// Request to translate a craft by a whole-voxel offset, optionally into a
/// different world. Offsets are integer on purpose: crafts snap to voxels,
/// and a fractional offset would desynchronize rider teleportation.
#[derive(Event, Debug, Clone, Copy)]
pub struct MoveCraftRequest {
    pub craft: Entity,
    pub offset: IVec3,
    /// Destination world; `None` moves within the craft's current world.
    pub target_world: Option<WorldId>,
}

/// Request to rotate a craft about its origin by a quarter-turn step.
#[derive(Event, Debug, Clone, Copy)]
pub struct RotateCraftRequest {
    pub craft: Entity,
    pub rotation: Rotation,
}

/// Fired after a transform commits.
#[derive(Event, Debug, Clone, Copy)]
pub struct CraftTransformed {
    pub craft: Entity,
    pub moved: usize,
    pub rotation: Rotation,
}

/// Shared tail of the move and rotate systems: run the engine, then finish
/// the bookkeeping the engine cannot reach — rider transport, the rotation
/// hitbox rebuild, failure messaging.
#[allow(clippy::too_many_arguments)]
fn run_transform<M>(
    craft_entity: Entity,
    craft: &mut Craft,
    universe: &mut Universe,
    registry: &mut MultiblockRegistry,
    poses: &mut Query<(&mut Pose, Has<Player>)>,
    chat: &mut EventWriter<ChatMessage>,
    transformed: &mut EventWriter<CraftTransformed>,
    mapping: &M,
    target_world: WorldId,
    rotation: Rotation,
) where
    M: Fn(DVec3) -> DVec3 + Sync,
{
    match change(craft, universe, registry, mapping, target_world, rotation) {
        Ok(TransformReport {
            moved,
            old_origin,
            rotation,
            target_world,
        }) => {
            for &rider in &craft.passengers {
                if let Ok((mut pose, is_player)) = poses.get_mut(rider) {
                    transport_rider(
                        &mut pose,
                        is_player,
                        old_origin,
                        rotation,
                        target_world,
                        mapping,
                    );
                }
            }
            if rotation != Rotation::None {
                // A rotated per-column fill is not the fill of the rotated
                // blocks; rebuild instead of rotating the hitbox.
                craft.recalculate_hitbox();
            }
            transformed.send(CraftTransformed {
                craft: craft_entity,
                moved,
                rotation,
            });
        }
        Err(TransformError::Collision { block, pos }) => {
            chat.send(ChatMessage::to_riders(
                craft_entity,
                format!(
                    "Blocked by {} at ({}, {}, {})!",
                    block.name(),
                    pos.x,
                    pos.y,
                    pos.z
                ),
            ));
        }
        Err(err @ TransformError::BlockCountMismatch { .. }) => {
            error!("craft {craft_entity:?}: {err}");
            chat.send(ChatMessage::to_actor(
                craft.owner,
                "Lost blocks while moving! This is a bug!".to_string(),
            ));
        }
        Err(err) => {
            error!("craft {craft_entity:?}: transform failed: {err}");
        }
    }
}

pub fn handle_move_requests(
    mut requests: EventReader<MoveCraftRequest>,
    mut crafts: Query<&mut Craft>,
    mut universe: ResMut<Universe>,
    mut registry: ResMut<MultiblockRegistry>,
    mut poses: Query<(&mut Pose, Has<Player>)>,
    mut chat: EventWriter<ChatMessage>,
    mut transformed: EventWriter<CraftTransformed>,
) {
    for request in requests.read() {
        let Ok(mut craft) = crafts.get_mut(request.craft) else {
            continue;
        };
        let target_world = request.target_world.unwrap_or(craft.world);
        let offset = request.offset.as_dvec3();
        let mapping = move |current: DVec3| current + offset;
        run_transform(
            request.craft,
            &mut craft,
            &mut universe,
            &mut registry,
            &mut poses,
            &mut chat,
            &mut transformed,
            &mapping,
            target_world,
            Rotation::None,
        );
    }
}

pub fn handle_rotate_requests(
    mut requests: EventReader<RotateCraftRequest>,
    mut crafts: Query<&mut Craft>,
    mut universe: ResMut<Universe>,
    mut registry: ResMut<MultiblockRegistry>,
    mut poses: Query<(&mut Pose, Has<Player>)>,
    mut chat: EventWriter<ChatMessage>,
    mut transformed: EventWriter<CraftTransformed>,
) {
    for request in requests.read() {
        let Ok(mut craft) = crafts.get_mut(request.craft) else {
            continue;
        };
        let target_world = craft.world;
        let pivot = craft.origin.as_dvec3();
        let rotation = request.rotation;
        let mapping = move |current: DVec3| rotate_by(current, pivot, rotation);
        run_transform(
            request.craft,
            &mut craft,
            &mut universe,
            &mut registry,
            &mut poses,
            &mut chat,
            &mut transformed,
            &mapping,
            target_world,
            rotation,
        );
    }
}

pub struct TransformPlugin;

impl Plugin for TransformPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MoveCraftRequest>()
            .add_event::<RotateCraftRequest>()
            .add_event::<CraftTransformed>()
            .add_systems(
                Update,
                (handle_move_requests, handle_rotate_requests)
                    .chain()
                    .before(deliver_chat_messages)
                    .before(flush_block_updates),
            );
    }
}
