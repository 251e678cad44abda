use bevy::prelude::*;
use std::time::Instant;

use crate::config::DetectionConfig;
use crate::craft::Craft;
use crate::messages::{deliver_chat_messages, ChatMessage};
use crate::multiblock::{MultiblockId, MultiblockRegistry};
use crate::world::Universe;

use super::flood::{flood_fill, FloodResult};

/// Request a full re-detection of a craft from its current origin.
#[derive(Event, Debug, Clone, Copy)]
pub struct DetectCraftRequest {
    pub craft: Entity,
}

/// Recompute `detected_blocks`, `bounds`, and multiblock handles for each
/// requested craft.
///
/// The previous detected set seeds the scan, so nudging one block and
/// re-detecting is cheap. On overflow the craft is emptied — rollback, not
/// truncation — and the owner is told. Either way the outcome is reported
/// through chat; messages are observability, not a correctness signal.
pub fn handle_detect_requests(
    mut requests: EventReader<DetectCraftRequest>,
    mut crafts: Query<&mut Craft>,
    universe: Res<Universe>,
    config: Res<DetectionConfig>,
    registry: Res<MultiblockRegistry>,
    mut chat: EventWriter<ChatMessage>,
) {
    for request in requests.read() {
        let Ok(mut craft) = crafts.get_mut(request.craft) else {
            continue;
        };
        let Some(world) = universe.world(craft.world) else {
            warn!("detect request for craft in missing world {:?}", craft.world);
            continue;
        };

        let start = Instant::now();
        let seeds = std::mem::take(&mut craft.detected_blocks);

        match flood_fill(world, craft.origin, &seeds, &config) {
            FloodResult::Overflow => {
                craft.bounds.clear();
                craft.multiblocks.clear();
                chat.send(ChatMessage::to_actor(
                    craft.owner,
                    format!("Detection limit reached. ({} blocks)", config.size_limit),
                ));
            }
            FloodResult::Detected { blocks, regions } => {
                craft.detected_blocks = blocks;
                let elapsed_ms = (start.elapsed().as_millis() as u64).max(1);
                chat.send(ChatMessage::to_actor(
                    craft.owner,
                    format!("Craft detected! ({} blocks)", craft.block_count()),
                ));
                chat.send(ChatMessage::to_actor(
                    craft.owner,
                    format!(
                        "Detected {} blocks in {}ms. ({} blocks/ms)",
                        craft.block_count(),
                        elapsed_ms,
                        craft.block_count() as u64 / elapsed_ms
                    ),
                ));

                let hitbox_start = Instant::now();
                craft.recalculate_hitbox();
                chat.send(ChatMessage::to_actor(
                    craft.owner,
                    format!(
                        "Calculated hitbox in {}ms. ({} blocks)",
                        hitbox_start.elapsed().as_millis(),
                        craft.bounds.len()
                    ),
                ));

                // Re-link multiblocks: everything anchored in a touched
                // region whose origin sits inside the new detected set.
                let handles: Vec<MultiblockId> = regions
                    .iter()
                    .flat_map(|region| registry.in_region(craft.world, *region))
                    .filter(|instance| craft.detected_blocks.contains(&instance.origin))
                    .map(|instance| instance.id)
                    .collect();
                craft.multiblocks = handles;
                chat.send(ChatMessage::to_actor(
                    craft.owner,
                    format!("Detected {} multiblocks", craft.multiblocks.len()),
                ));
            }
        }
    }
}

pub struct DetectionPlugin;

impl Plugin for DetectionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DetectCraftRequest>().add_systems(
            Update,
            handle_detect_requests.before(deliver_chat_messages),
        );
    }
}
