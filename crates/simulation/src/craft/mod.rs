//! The craft aggregate: a player-owned, movable set of connected voxels plus
//! its riders and attached multiblocks.

mod hitbox;
mod types;

pub use hitbox::calculate_hitbox;
pub use types::{Craft, OriginRelative};
