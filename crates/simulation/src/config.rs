use bevy::prelude::*;
use std::collections::HashSet;

use crate::block::Block;

/// Edge length of a cubic region, the spatial partition used for substructure
/// indexing and dirty tracking. Must be a power of two (coordinates are
/// shifted, not divided).
pub const REGION_SIZE: i32 = 16;
pub const REGION_SHIFT: u32 = 4;

/// Default cap on how many blocks a single craft may contain.
pub const DEFAULT_SIZE_LIMIT: usize = 10_000;

/// How many source blocks each transform worker task maps. Batches are
/// disjoint slices of the detected set, so workers never share a source.
pub const TRANSFORM_BATCH_SIZE: usize = 500;

/// Tunables for craft detection, settable per world or per test.
///
/// `undetectable` blocks are skipped by the flood fill: they are neither
/// recorded nor expanded, so placing them deliberately severs connectivity
/// (e.g. a ring of glass panes isolates a docked shuttle from the station).
#[derive(Resource, Clone, Debug)]
pub struct DetectionConfig {
    pub undetectable: HashSet<Block>,
    pub size_limit: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        let mut undetectable = HashSet::new();
        undetectable.insert(Block::GlassPane);
        Self {
            undetectable,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}
