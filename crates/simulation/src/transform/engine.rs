use bevy::math::{DVec3, IVec3};
use bevy::tasks::{ComputeTaskPool, TaskPool};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::block::{Block, TileEntity};
use crate::config::TRANSFORM_BATCH_SIZE;
use crate::craft::Craft;
use crate::multiblock::MultiblockRegistry;
use crate::rotation::{to_block_pos, Rotation};
use crate::world::{Universe, VoxelWorld, WorldId};

/// Why a transform refused to commit. Every variant except
/// `BlockCountMismatch` is raised before any world write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// A destination voxel holds a foreign non-air block.
    Collision { block: Block, pos: IVec3 },
    /// Two source voxels mapped onto the same destination. The mapping is
    /// not injective over this craft; committing it would lose blocks.
    TargetOverlap { pos: IVec3 },
    /// The source or destination world does not exist.
    MissingWorld(WorldId),
    /// Post-commit accounting found a different block count. Structurally
    /// unreachable (the new set is derived from the target table); kept as a
    /// loud invariant check rather than a silent log line.
    BlockCountMismatch { before: usize, after: usize },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Collision { block, pos } => {
                write!(
                    f,
                    "blocked by {} at ({}, {}, {})",
                    block.name(),
                    pos.x,
                    pos.y,
                    pos.z
                )
            }
            TransformError::TargetOverlap { pos } => {
                write!(
                    f,
                    "two blocks map onto ({}, {}, {})",
                    pos.x, pos.y, pos.z
                )
            }
            TransformError::MissingWorld(id) => write!(f, "world {} does not exist", id.0),
            TransformError::BlockCountMismatch { before, after } => {
                write!(f, "block count changed from {before} to {after} during transform")
            }
        }
    }
}

impl std::error::Error for TransformError {}

/// What a committed transform did, for the caller's bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct TransformReport {
    /// Number of blocks written (always equals the detected count).
    pub moved: usize,
    /// The craft origin before the transform; riders rotate about this.
    pub old_origin: IVec3,
    pub rotation: Rotation,
    pub target_world: WorldId,
}

/// Phase 1: map every source voxel to its destination, in parallel.
///
/// Sources are partitioned into disjoint batches; one task per batch runs on
/// the compute pool and returns its own pair list. `scope` blocks until every
/// task finishes — a full barrier, because validation needs the complete
/// table to tell a collision from the craft vacating its own footprint. The
/// merged table has provably disjoint keys since `chunks` never repeats a
/// source.
pub fn compute_targets<M>(blocks: &HashSet<IVec3>, mapping: &M) -> HashMap<IVec3, IVec3>
where
    M: Fn(DVec3) -> DVec3 + Sync,
{
    let sources: Vec<IVec3> = blocks.iter().copied().collect();
    let pool = ComputeTaskPool::get_or_init(TaskPool::default);
    let batches: Vec<Vec<(IVec3, IVec3)>> = pool.scope(|scope| {
        for batch in sources.chunks(TRANSFORM_BATCH_SIZE) {
            scope.spawn(async move {
                batch
                    .iter()
                    .map(|&source| (source, to_block_pos(mapping(source.as_dvec3()))))
                    .collect()
            });
        }
    });
    batches.into_iter().flatten().collect()
}

/// Prior state of every destination voxel, captured before any write so a
/// write never reads a state that an earlier write in the same operation
/// already clobbered.
struct Snapshot {
    blocks: HashMap<IVec3, Block>,
    tiles: HashMap<IVec3, TileEntity>,
}

/// Phase 2: reject collisions and non-injective mappings, and snapshot the
/// destinations. Runs strictly before any mutation.
fn validate(
    craft: &Craft,
    target_world: &VoxelWorld,
    cross_world: bool,
    targets: &HashMap<IVec3, IVec3>,
) -> Result<Snapshot, TransformError> {
    let mut seen = HashSet::with_capacity(targets.len());
    let mut blocks = HashMap::new();
    let mut tiles = HashMap::new();

    for &target in targets.values() {
        if !seen.insert(target) {
            return Err(TransformError::TargetOverlap { pos: target });
        }
        let state = target_world.block_at(target);
        // A non-air destination is fine only when it is a voxel this craft is
        // about to vacate. The footprint lives in the source world, so it
        // excuses nothing on a cross-world move.
        if !state.is_air() && !(craft.detected_blocks.contains(&target) && !cross_world) {
            return Err(TransformError::Collision { block: state, pos: target });
        }
        if let Some(tile) = target_world.tile_at(target) {
            tiles.insert(target, tile.clone());
        }
        blocks.insert(target, state);
    }

    if cross_world {
        // "Already moved" cannot apply across worlds; reads must be fresh
        // from the source world at write time.
        blocks.clear();
        tiles.clear();
    }

    Ok(Snapshot { blocks, tiles })
}

/// Phase 3, same-world: write every pair in place over a single world.
fn apply_same_world(
    world: &mut VoxelWorld,
    target_world_id: WorldId,
    targets: &HashMap<IVec3, IVec3>,
    mut snapshot: Snapshot,
    rotation: Rotation,
) {
    let target_set: HashSet<IVec3> = targets.values().copied().collect();

    for (&source, &target) in targets {
        // Snapshot-corrected read: if the source voxel is also some pair's
        // destination it may have been overwritten already; the snapshot
        // holds what was there when this operation started.
        let state = snapshot
            .blocks
            .get(&source)
            .copied()
            .unwrap_or_else(|| world.block_at(source));

        // Claim the moving tile before touching the destination. Same
        // snapshot rule: a source that doubles as a destination keeps its
        // tile in the snapshot, everything else is read live.
        let moving_tile = if state.has_tile_entity() {
            snapshot
                .tiles
                .remove(&source)
                .or_else(|| world.detach_tile(source))
        } else {
            None
        };

        // Each destination is written exactly once (validation rejects
        // overlap), so anything attached there now is a leftover from a
        // voxel this craft vacated.
        world.detach_tile(target);
        world.set_block_fast(target, state.rotated(rotation));

        if let Some(mut tile) = moving_tile {
            tile.pos = target;
            tile.world = target_world_id;
            tile.modified = true;
            world.attach_tile(tile);
        }

        // Clear the source only when no other block lands on it; this is
        // what lets in-place rotations and one-step slides not erase
        // themselves.
        if !target_set.contains(&source) {
            world.set_block_fast(source, Block::Air);
        }
    }
}

/// Phase 3, cross-world: collect from the source world, write into the
/// destination world, then vacate every source.
fn apply_cross_world(
    universe: &mut Universe,
    source_id: WorldId,
    target_id: WorldId,
    targets: &HashMap<IVec3, IVec3>,
    rotation: Rotation,
) -> Result<(), TransformError> {
    let mut moves: Vec<(IVec3, Block, Option<TileEntity>)> = Vec::with_capacity(targets.len());
    {
        let source_world = universe
            .world_mut(source_id)
            .ok_or(TransformError::MissingWorld(source_id))?;
        for (&source, &target) in targets {
            let state = source_world.block_at(source);
            let tile = if state.has_tile_entity() {
                source_world.detach_tile(source)
            } else {
                None
            };
            moves.push((target, state, tile));
        }
    }
    {
        let target_world = universe
            .world_mut(target_id)
            .ok_or(TransformError::MissingWorld(target_id))?;
        for (target, state, tile) in moves {
            target_world.detach_tile(target);
            target_world.set_block_fast(target, state.rotated(rotation));
            if let Some(mut tile) = tile {
                tile.pos = target;
                tile.world = target_id;
                tile.modified = true;
                target_world.attach_tile(tile);
            }
        }
    }
    {
        // Every source is vacated: with distinct worlds, no destination can
        // coincide with a source.
        let source_world = universe
            .world_mut(source_id)
            .ok_or(TransformError::MissingWorld(source_id))?;
        for &source in targets.keys() {
            source_world.set_block_fast(source, Block::Air);
        }
    }
    Ok(())
}

/// The whole pipeline: map, validate, apply, and rewrite the craft's own
/// bookkeeping. Either commits completely — new detected set, origin, and
/// world on the craft, every block and tile moved, multiblocks re-anchored —
/// or returns an error with the craft and both worlds untouched.
///
/// Rider transport stays with the caller: riders are ECS entities and their
/// poses are not reachable from here. Callers use the returned
/// [`TransformReport`] (notably `old_origin`) to finish the job.
pub fn change<M>(
    craft: &mut Craft,
    universe: &mut Universe,
    registry: &mut MultiblockRegistry,
    mapping: &M,
    target_world: WorldId,
    rotation: Rotation,
) -> Result<TransformReport, TransformError>
where
    M: Fn(DVec3) -> DVec3 + Sync,
{
    let source_world = craft.world;
    let cross_world = source_world != target_world;
    let targets = compute_targets(&craft.detected_blocks, mapping);

    let snapshot = {
        let destination = universe
            .world(target_world)
            .ok_or(TransformError::MissingWorld(target_world))?;
        validate(craft, destination, cross_world, &targets)?
    };

    if cross_world {
        apply_cross_world(universe, source_world, target_world, &targets, rotation)?;
    } else {
        let world = universe
            .world_mut(source_world)
            .ok_or(TransformError::MissingWorld(source_world))?;
        apply_same_world(world, target_world, &targets, snapshot, rotation);
    }

    // The committed set comes straight from the target table, so block loss
    // cannot be introduced past this point by construction.
    let new_detected: HashSet<IVec3> = targets.values().copied().collect();
    let before = craft.detected_blocks.len();
    let after = new_detected.len();
    if before != after {
        return Err(TransformError::BlockCountMismatch { before, after });
    }

    // Re-anchor multiblocks through the registry; dangling handles drop out.
    let mut kept = Vec::with_capacity(craft.multiblocks.len());
    for &id in &craft.multiblocks {
        let Some(instance) = registry.remove(id) else {
            continue;
        };
        let new_origin = to_block_pos(mapping(instance.origin.as_dvec3()));
        registry.insert(instance.with_origin(new_origin, target_world));
        kept.push(id);
    }
    craft.multiblocks = kept;

    let old_origin = craft.origin;
    craft.detected_blocks = new_detected;
    craft.world = target_world;
    craft.origin = to_block_pos(mapping(old_origin.as_dvec3()));

    Ok(TransformReport {
        moved: after,
        old_origin,
        rotation,
        target_world,
    })
}
