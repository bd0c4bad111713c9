//! Ray type and operations

use super::aabb::Aabb;
use crate::core::types::Vec3;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Precomputed 1/direction for fast AABB intersection
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z),
        }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray-AABB slab intersection that also reports the outward face normal
    /// of the entering slab. The normal is axis-aligned in the box's own
    /// frame, which is what adjacent-placement along a face needs.
    pub fn intersects_aabb_with_normal(&self, aabb: &Aabb) -> Option<(f32, Vec3)> {
        let t1 = (aabb.min - self.origin) * self.inv_direction;
        let t2 = (aabb.max - self.origin) * self.inv_direction;

        let t_min = t1.min(t2);
        let t_max = t1.max(t2);

        let t_near = t_min.x.max(t_min.y).max(t_min.z);
        let t_far = t_max.x.min(t_max.y).min(t_max.z);

        if t_near > t_far || t_far < 0.0 {
            return None;
        }

        // The entering axis is the one whose slab was crossed last.
        let normal = if t_near == t_min.x {
            Vec3::new(-self.direction.x.signum(), 0.0, 0.0)
        } else if t_near == t_min.y {
            Vec3::new(0.0, -self.direction.y.signum(), 0.0)
        } else {
            Vec3::new(0.0, 0.0, -self.direction.z.signum())
        };

        Some((t_near.max(0.0), normal))
    }
}
