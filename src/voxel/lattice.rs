//! Lattice position key codec
//!
//! A voxel's identity inside its array is its integer lattice position.
//! Slots are two world units apart, so the canonical half-extent-1 cube of
//! one slot sits flush against its six face neighbors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Vec3};

/// Array-local distance between adjacent lattice slots.
pub const LATTICE_STEP: f32 = 2.0;

/// Integer lattice coordinate identifying one voxel slot in an array.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LatticePos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LatticePos {
    pub const ORIGIN: LatticePos = LatticePos { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Stable, injective identity key, also used as the host object name.
    pub fn key(&self) -> String {
        format!("Voxel({}, {}, {})", self.x, self.y, self.z)
    }

    /// Center of this slot in array-local space.
    pub fn to_local(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32) * LATTICE_STEP
    }

    /// Snap an array-local point to the nearest lattice slot.
    pub fn from_local(p: Vec3) -> Self {
        Self::new(
            (p.x / LATTICE_STEP).round() as i32,
            (p.y / LATTICE_STEP).round() as i32,
            (p.z / LATTICE_STEP).round() as i32,
        )
    }

    /// Offset by whole slots.
    pub fn offset(self, d: IVec3) -> Self {
        Self::new(self.x + d.x, self.y + d.y, self.z + d.z)
    }

    /// The slot one step along an axis-aligned face normal, i.e. the
    /// position adjacent to this voxel on the hit face.
    pub fn step_along(self, normal: Vec3) -> Self {
        self.offset(IVec3::new(
            normal.x.round() as i32,
            normal.y.round() as i32,
            normal.z.round() as i32,
        ))
    }
}

impl fmt::Display for LatticePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Voxel({}, {}, {})", self.x, self.y, self.z)
    }
}
