use bevy::math::IVec3;
use std::collections::HashSet;

use crate::config::DetectionConfig;
use crate::world::{region_of, VoxelWorld};

/// Outcome of a connectivity scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloodResult {
    Detected {
        /// Every voxel belonging to the craft.
        blocks: HashSet<IVec3>,
        /// Every region the scan touched, for the multiblock lookup pass.
        regions: HashSet<IVec3>,
    },
    /// The size cap was exceeded. No partial set is returned: a partially
    /// detected ship is unsafe to operate on.
    Overflow,
}

/// Iterative breadth-first flood fill over the 26-neighborhood.
///
/// `seeds` is the previous detected set, reused as the initial frontier so
/// re-detection after a small edit stays cheap; `origin` is always seeded.
/// Air and `config.undetectable` blocks are skipped: neither recorded nor
/// expanded. Each voxel is expanded at most once (the `checked` set is kept
/// separate from the detected set so skipped voxels are not re-enqueued).
pub fn flood_fill(
    world: &VoxelWorld,
    origin: IVec3,
    seeds: &HashSet<IVec3>,
    config: &DetectionConfig,
) -> FloodResult {
    let mut frontier: Vec<IVec3> = seeds.iter().copied().collect();
    frontier.push(origin);
    let mut checked: HashSet<IVec3> = frontier.iter().copied().collect();

    let mut blocks = HashSet::new();
    let mut regions = HashSet::new();

    while let Some(current) = frontier.pop() {
        let state = world.block_at(current);
        if state.is_air() || config.undetectable.contains(&state) {
            continue;
        }

        blocks.insert(current);
        if blocks.len() > config.size_limit {
            return FloodResult::Overflow;
        }
        regions.insert(region_of(current));

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    let neighbor = current + IVec3::new(dx, dy, dz);
                    if checked.insert(neighbor) {
                        frontier.push(neighbor);
                    }
                }
            }
        }
    }

    FloodResult::Detected { blocks, regions }
}
