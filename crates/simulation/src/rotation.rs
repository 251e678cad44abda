//! Horizontal-plane rotation math shared by the transform engine and rider
//! transport. Crafts only ever rotate in quarter turns, but the underlying
//! coordinate rotation accepts an arbitrary angle for other callers.

use bevy::math::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

/// A quarter-turn rotation in the horizontal plane. Positive = clockwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Counterclockwise90,
}

impl Rotation {
    pub fn as_radians(self) -> f64 {
        match self {
            Rotation::None => 0.0,
            Rotation::Clockwise90 => std::f64::consts::FRAC_PI_2,
            Rotation::Clockwise180 => std::f64::consts::PI,
            Rotation::Counterclockwise90 => -std::f64::consts::FRAC_PI_2,
        }
    }

    pub fn as_degrees(self) -> f64 {
        self.as_radians().to_degrees()
    }

    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Counterclockwise90)
    }
}

/// Rotate `loc` around `origin` by `theta` radians in the horizontal plane.
/// Positive `theta` rotates clockwise, negative counter-clockwise. Y is
/// unchanged.
pub fn rotate_coordinates(loc: DVec3, origin: DVec3, theta: f64) -> DVec3 {
    let (sin, cos) = theta.sin_cos();
    DVec3::new(
        origin.x + ((loc.x - origin.x) * cos) - ((loc.z - origin.z) * sin),
        loc.y,
        origin.z + ((loc.x - origin.x) * sin) + ((loc.z - origin.z) * cos),
    )
}

/// Rotate `loc` around `origin` by a quarter-turn `rotation`.
pub fn rotate_by(loc: DVec3, origin: DVec3, rotation: Rotation) -> DVec3 {
    rotate_coordinates(loc, origin, rotation.as_radians())
}

/// Snap a continuous position to the voxel it lands in. Transform targets are
/// computed in floating point but the world is integer-addressed, so every
/// mapped coordinate passes through here exactly once.
pub fn to_block_pos(loc: DVec3) -> IVec3 {
    IVec3::new(
        loc.x.round() as i32,
        loc.y.round() as i32,
        loc.z.round() as i32,
    )
}
