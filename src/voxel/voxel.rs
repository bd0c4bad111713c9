//! Single placed voxel entity

use serde::{Deserialize, Serialize};

use super::lattice::LatticePos;
use crate::core::types::{Mat4, Vec3};
use crate::host::ObjectId;
use crate::math::{Aabb, Ray};

/// How a voxel is displayed by the host viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawType {
    #[default]
    Textured,
    Solid,
    Wire,
}

/// Result of casting a pick ray against one voxel.
///
/// Transient: exists only for the duration of a pick query. The caller keeps
/// the candidate with the smallest `dist_squared`.
#[derive(Clone, Copy, Debug)]
pub struct VoxelRayIntersection {
    /// Lattice position of the voxel that was hit.
    pub position: LatticePos,
    /// Hit point in world space.
    pub hit_world: Vec3,
    /// Outward face normal in the voxel's local axes (identical to the
    /// array's lattice axes, since a voxel is only translated within it).
    pub normal: Vec3,
    /// Squared distance from the ray origin to the hit, in world units.
    pub dist_squared: f32,
}

/// One placed unit volume, owned by exactly one [`VoxelArray`].
///
/// [`VoxelArray`]: super::array::VoxelArray
#[derive(Clone, Debug)]
pub struct Voxel {
    position: LatticePos,
    handle: ObjectId,
    draw_type: DrawType,
    /// Result object of the last boolean intersection pass, if any.
    intersection: Option<ObjectId>,
}

impl Voxel {
    pub(crate) fn new(position: LatticePos, handle: ObjectId, draw_type: DrawType) -> Self {
        Self {
            position,
            handle,
            draw_type,
            intersection: None,
        }
    }

    /// Lattice position, immutable for the voxel's lifetime. Moving a voxel
    /// is a delete followed by a create at the new slot.
    pub fn position(&self) -> LatticePos {
        self.position
    }

    /// Host object backing this voxel.
    pub fn handle(&self) -> ObjectId {
        self.handle
    }

    pub fn draw_type(&self) -> DrawType {
        self.draw_type
    }

    pub fn set_draw_type(&mut self, draw_type: DrawType) {
        self.draw_type = draw_type;
    }

    /// Attached boolean-intersection result, at most one per voxel.
    pub fn intersection(&self) -> Option<ObjectId> {
        self.intersection
    }

    pub(crate) fn set_intersection(&mut self, id: ObjectId) {
        self.intersection = Some(id);
    }

    pub(crate) fn take_intersection(&mut self) -> Option<ObjectId> {
        self.intersection.take()
    }

    /// World transform of this voxel's canonical cube.
    pub fn world_matrix(&self, array_world: &Mat4) -> Mat4 {
        *array_world * Mat4::from_translation(self.position.to_local())
    }

    /// Cast a world-space segment against this voxel.
    ///
    /// The segment is moved into the voxel's local frame with the inverse of
    /// its placement transform and slab-tested against the canonical cube;
    /// a hit is mapped back to world space for the distance comparison.
    pub fn ray_cast(
        &self,
        array_world: &Mat4,
        origin: Vec3,
        target: Vec3,
    ) -> Option<VoxelRayIntersection> {
        let world = self.world_matrix(array_world);
        let inverse = world.inverse();

        let local_origin = inverse.transform_point3(origin);
        let local_target = inverse.transform_point3(target);
        let segment = local_target - local_origin;
        let length = segment.length();
        if length <= f32::EPSILON {
            return None;
        }

        let ray = Ray::new(local_origin, segment / length);
        let (t, normal) = ray.intersects_aabb_with_normal(&Aabb::unit_cube())?;
        if t > length {
            // Hit lies beyond the segment's end.
            return None;
        }

        let hit_world = world.transform_point3(ray.at(t));
        Some(VoxelRayIntersection {
            position: self.position,
            hit_world,
            normal,
            dist_squared: (hit_world - origin).length_squared(),
        })
    }
}
