//! Sparse voxel array store
//!
//! A `VoxelArray` owns the voxels of one independent structure, keyed by
//! lattice position, anchored at an origin transform that maps its lattice
//! space into the world.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use super::lattice::LatticePos;
use super::voxel::{DrawType, Voxel, VoxelRayIntersection};
use crate::core::error::Error;
use crate::core::types::{Mat4, Quat, Result, Vec3};
use crate::host::{Host, ObjectId};

/// Placement of an array's local lattice space in world space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OriginTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for OriginTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl OriginTransform {
    /// Identity placement (lattice space is world space).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only placement.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.translation,
        )
    }
}

/// Cooperative cancellation flag for the intersection pass, checked between
/// voxels only.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of one boolean intersection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntersectionReport {
    /// Voxels whose boolean op succeeded.
    pub completed: usize,
    /// Voxels whose boolean op failed and were skipped.
    pub failed: usize,
    /// Whether the pass stopped early at the cancel token.
    pub cancelled: bool,
}

/// Sparse collection of voxels anchored at one origin transform.
pub struct VoxelArray {
    handle: ObjectId,
    origin: OriginTransform,
    voxels: HashMap<LatticePos, Voxel>,
    draw_type: DrawType,
    created: bool,
    pub(crate) selected: bool,
    intersected: bool,
    reference_object: Option<ObjectId>,
}

impl VoxelArray {
    /// Wrap a host anchor object as an empty voxel array.
    pub fn new(handle: ObjectId, origin: OriginTransform) -> Self {
        Self {
            handle,
            origin,
            voxels: HashMap::new(),
            draw_type: DrawType::default(),
            created: false,
            selected: false,
            intersected: false,
            reference_object: None,
        }
    }

    /// Host anchor object this array is attached to.
    pub fn handle(&self) -> ObjectId {
        self.handle
    }

    pub fn origin(&self) -> &OriginTransform {
        &self.origin
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.origin.to_mat4()
    }

    /// Whether the array has been seeded with at least one voxel.
    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Whether this array is the current interactive edit target. At most
    /// one array per session is selected; see `EditSession::select_array`.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether at least one intersection pass has completed successfully.
    pub fn is_intersected(&self) -> bool {
        self.intersected
    }

    /// Reference object of the last intersection pass, if any.
    pub fn reference_object(&self) -> Option<ObjectId> {
        self.reference_object
    }

    pub fn set_reference_object(&mut self, id: Option<ObjectId>) {
        self.reference_object = id;
    }

    /// Array-wide default display mode for newly created voxels.
    pub fn draw_type(&self) -> DrawType {
        self.draw_type
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Iterate over the contained voxels in no particular order.
    pub fn voxels(&self) -> impl Iterator<Item = &Voxel> {
        self.voxels.values()
    }

    pub fn lookup(&self, pos: LatticePos) -> Option<&Voxel> {
        self.voxels.get(&pos)
    }

    pub fn lookup_mut(&mut self, pos: LatticePos) -> Option<&mut Voxel> {
        self.voxels.get_mut(&pos)
    }

    /// Strict lookup for callers that treat absence as an error rather than
    /// a benign miss.
    pub fn require(&self, pos: LatticePos) -> Result<&Voxel> {
        self.voxels.get(&pos).ok_or(Error::NotFound(pos))
    }

    /// Map an array-local point to world space.
    pub fn local_to_world(&self, p: Vec3) -> Vec3 {
        self.world_matrix().transform_point3(p)
    }

    /// Map a world-space point into the array's lattice space.
    pub fn world_to_local(&self, p: Vec3) -> Vec3 {
        self.world_matrix().inverse().transform_point3(p)
    }

    /// Clear this array's edit-target flag. Idempotent.
    pub fn deselect(&mut self) {
        self.selected = false;
    }

    /// Create a voxel at a lattice position.
    ///
    /// Occupied slots are rejected with [`Error::PositionOccupied`], leaving
    /// all state untouched; the new voxel takes the array's current draw
    /// type. Host failure propagates before any bookkeeping happens.
    pub fn create_voxel(&mut self, host: &mut dyn Host, pos: LatticePos) -> Result<&Voxel> {
        if self.voxels.contains_key(&pos) {
            return Err(Error::PositionOccupied(pos));
        }

        let center = self.local_to_world(pos.to_local());
        let handle = host.create_cube(center)?;
        log::debug!("created {pos} (handle {handle:?})");

        self.created = true;
        Ok(self
            .voxels
            .entry(pos)
            .or_insert(Voxel::new(pos, handle, self.draw_type)))
    }

    /// Seed a fresh array with its first voxel, one step up the lattice,
    /// and mark it created.
    pub fn initialize(&mut self, host: &mut dyn Host) -> Result<&Voxel> {
        self.create_voxel(host, LatticePos::new(0, 0, 1))
    }

    /// Delete the voxel at a position, destroying its intersection result
    /// first. Returns `Ok(false)` when the slot was already empty.
    pub fn delete_voxel(&mut self, host: &mut dyn Host, pos: LatticePos) -> Result<bool> {
        let Some(mut voxel) = self.voxels.remove(&pos) else {
            log::debug!("delete at {pos}: nothing removed");
            return Ok(false);
        };

        if let Some(result) = voxel.take_intersection() {
            host.delete_object(result)?;
        }
        host.delete_object(voxel.handle())?;
        log::debug!("deleted {pos}");
        Ok(true)
    }

    /// Destroy every voxel and its host objects, emptying the array.
    pub fn clear(&mut self, host: &mut dyn Host) -> Result<()> {
        let positions: Vec<LatticePos> = self.voxels.keys().copied().collect();
        for pos in positions {
            self.delete_voxel(host, pos)?;
        }
        self.intersected = false;
        Ok(())
    }

    /// Cast a world-space segment against every voxel and keep the globally
    /// nearest hit by squared distance.
    ///
    /// A linear scan per pick: fine at the ~2000-voxel scale this store is
    /// built for; a hash grid over lattice cells is the upgrade path beyond
    /// that. First voxel seen wins an exact distance tie.
    pub fn cast_ray(&self, origin: Vec3, target: Vec3) -> Option<VoxelRayIntersection> {
        let world = self.world_matrix();
        let mut best: Option<VoxelRayIntersection> = None;
        for voxel in self.voxels.values() {
            if let Some(hit) = voxel.ray_cast(&world, origin, target) {
                let closer = best
                    .as_ref()
                    .is_none_or(|b| hit.dist_squared < b.dist_squared);
                if closer {
                    best = Some(hit);
                }
            }
        }
        best
    }

    /// Set the array default draw type and push it to every voxel.
    /// Bulk, not transactional.
    pub fn apply_draw_type(&mut self, draw_type: DrawType) {
        self.draw_type = draw_type;
        for voxel in self.voxels.values_mut() {
            voxel.set_draw_type(draw_type);
        }
    }

    /// Boolean-intersect every voxel with a reference object.
    ///
    /// Per voxel: any stale result object is deleted, the host boolean op
    /// runs, and its result is attached. A failed boolean op is logged,
    /// counted, and skipped; the pass continues, since partial results are
    /// still useful. `progress` fires after every processed voxel with
    /// `round(100 * done / total)`. The cancel token is honored between
    /// voxels and yields a partial report.
    pub fn run_intersection(
        &mut self,
        host: &mut dyn Host,
        reference: ObjectId,
        progress: &mut dyn FnMut(u8),
        cancel: &CancelToken,
    ) -> Result<IntersectionReport> {
        let total = self.voxels.len();
        let mut report = IntersectionReport::default();

        // Sorted order keeps progress and failure attribution reproducible.
        let mut order: Vec<LatticePos> = self.voxels.keys().copied().collect();
        order.sort();

        for (done, pos) in order.iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                log::info!("intersection pass cancelled after {done}/{total} voxels");
                break;
            }
            let Some(voxel) = self.voxels.get_mut(pos) else {
                continue;
            };

            if let Some(stale) = voxel.take_intersection() {
                host.delete_object(stale)?;
            }

            match host.boolean_intersect(voxel.handle(), reference) {
                Ok(result) => {
                    voxel.set_intersection(result);
                    report.completed += 1;
                }
                Err(err) => {
                    let err = Error::IntersectionFailed {
                        position: *pos,
                        reason: err.to_string(),
                    };
                    log::warn!("{err}");
                    report.failed += 1;
                }
            }

            let percent = (((done + 1) as f32 / total as f32) * 100.0).round() as u8;
            progress(percent);
        }

        if report.completed > 0 {
            self.intersected = true;
            self.reference_object = Some(reference);
        }
        log::info!(
            "intersection pass: {} ok, {} failed of {total}",
            report.completed,
            report.failed
        );
        Ok(report)
    }

    /// Host-select every voxel cube and any attached intersection result.
    pub fn select_children(&self, host: &mut dyn Host) {
        for voxel in self.voxels.values() {
            host.select(voxel.handle());
            if let Some(result) = voxel.intersection() {
                host.select(result);
            }
        }
    }

    /// Host-select only the intersection results. Returns the result that
    /// should become active: the one at the lowest lattice position.
    pub fn select_intersection(&self, host: &mut dyn Host) -> Option<ObjectId> {
        let mut order: Vec<&Voxel> = self.voxels.values().collect();
        order.sort_by_key(|v| v.position());

        let mut first = None;
        for voxel in order {
            if let Some(result) = voxel.intersection() {
                host.select(result);
                first = first.or(Some(result));
            }
        }
        first
    }

    /// Delete every voxel's intersection result and clear the array's
    /// intersected flag.
    pub fn clear_intersection(&mut self, host: &mut dyn Host) -> Result<()> {
        for voxel in self.voxels.values_mut() {
            if let Some(result) = voxel.take_intersection() {
                host.delete_object(result)?;
            }
        }
        self.intersected = false;
        Ok(())
    }
}
