use bevy::math::IVec3;
use serde::{Deserialize, Serialize};

use crate::rotation::Rotation;
use crate::world::WorldId;

/// Horizontal facing for oriented block states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    /// The facing after applying a quarter-turn rotation (clockwise positive).
    pub fn rotated(self, rotation: Rotation) -> Facing {
        let steps = match rotation {
            Rotation::None => 0,
            Rotation::Clockwise90 => 1,
            Rotation::Clockwise180 => 2,
            Rotation::Counterclockwise90 => 3,
        };
        let order = [Facing::North, Facing::East, Facing::South, Facing::West];
        let idx = order.iter().position(|f| *f == self).unwrap_or(0);
        order[(idx + steps) % 4]
    }
}

/// A block state in the voxel world. Absent map entries are `Air`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block {
    #[default]
    Air,
    Hull,
    Deck,
    /// Ship controls. Carries a tile entity (the helm log).
    Helm,
    /// Storage. Carries a tile entity (the inventory).
    Chest,
    /// Oriented: the nozzle direction rotates with the craft.
    Thruster(Facing),
    /// Decorative, deliberately undetectable: panes sever craft connectivity
    /// so adjacent structures can be kept separate.
    GlassPane,
}

impl Block {
    pub fn is_air(self) -> bool {
        self == Block::Air
    }

    /// Whether this block has a tile entity attached to its voxel.
    pub fn has_tile_entity(self) -> bool {
        matches!(self, Block::Helm | Block::Chest)
    }

    /// The state after rotating the containing structure.
    pub fn rotated(self, rotation: Rotation) -> Block {
        match self {
            Block::Thruster(facing) => Block::Thruster(facing.rotated(rotation)),
            other => other,
        }
    }

    /// Display name used in player-facing messages.
    pub fn name(self) -> &'static str {
        match self {
            Block::Air => "air",
            Block::Hull => "hull",
            Block::Deck => "deck",
            Block::Helm => "helm",
            Block::Chest => "chest",
            Block::Thruster(_) => "thruster",
            Block::GlassPane => "glass pane",
        }
    }
}

/// The sub-entity attached to a tile-entity block (chest inventory, helm
/// log). Owned by the world, keyed by voxel; transforms re-anchor it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEntity {
    pub pos: IVec3,
    pub world: WorldId,
    pub contents: Vec<String>,
    /// Set when the tile has unsaved changes; relocation always sets it.
    pub modified: bool,
}

impl TileEntity {
    pub fn new(pos: IVec3, world: WorldId) -> Self {
        Self {
            pos,
            world,
            contents: Vec::new(),
            modified: false,
        }
    }
}
