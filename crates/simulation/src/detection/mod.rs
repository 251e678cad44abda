//! Craft detection: a bounded flood fill that recomputes which voxels belong
//! to a craft, rebuilds its hitbox, and re-links multiblocks in the regions
//! the scan touched.

mod flood;
mod systems;

pub use flood::{flood_fill, FloodResult};
pub use systems::{handle_detect_requests, DetectCraftRequest, DetectionPlugin};
