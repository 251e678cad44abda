use bevy::math::IVec3;
use std::collections::HashSet;

use super::OriginRelative;

/// Fill `bounds` with an approximate solid volume derived from `detected`.
///
/// Every detected voxel is projected origin-relative and processed in
/// descending Y order; each one fills its (x, z) column from its own Y up to
/// the highest Y already recorded for that column. A column with a detected
/// floor and roof therefore reads as solid in between without the interior
/// ever being detected. False positives (hollow space marked inside) are
/// accepted; false negatives are not.
pub fn calculate_hitbox(
    detected: &HashSet<IVec3>,
    origin: IVec3,
    bounds: &mut HashSet<OriginRelative>,
) {
    let mut relative: Vec<OriginRelative> = detected
        .iter()
        .map(|pos| OriginRelative::of(*pos, origin))
        .collect();
    relative.sort_by_key(|block| -block.y);

    for block in relative {
        let max = bounds
            .iter()
            .filter(|b| b.x == block.x && b.z == block.z)
            .map(|b| b.y)
            .max()
            .unwrap_or(block.y);
        for y in block.y..=max {
            bounds.insert(OriginRelative {
                x: block.x,
                y,
                z: block.z,
            });
        }
    }
}
