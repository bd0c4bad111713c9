//! Host collaborator interface
//!
//! Everything the editing core delegates to the embedding application:
//! primitive creation, boolean mesh intersection, object deletion, and the
//! scene-wide selection/active-object state. All calls are synchronous.

use crate::core::types::{Result, Vec3};

/// Opaque handle to a host-owned renderable object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Synchronous collaborator contract consumed by the editing core.
///
/// Failures from any method are fatal to the calling operation and must be
/// propagated; the core never retries or partially cleans up beyond
/// releasing an already-captured selection backup.
pub trait Host {
    /// Create a unit cube primitive centered at a world-space position.
    fn create_cube(&mut self, center: Vec3) -> Result<ObjectId>;

    /// Boolean-intersect a volume object with a reference object and return
    /// the resulting mesh object. May fail on degenerate geometry.
    fn boolean_intersect(&mut self, volume: ObjectId, reference: ObjectId) -> Result<ObjectId>;

    /// Delete a host object.
    fn delete_object(&mut self, id: ObjectId) -> Result<()>;

    /// Whether the object still exists in the scene.
    fn exists(&self, id: ObjectId) -> bool;

    /// Currently active object, if any.
    fn active(&self) -> Option<ObjectId>;

    /// Set (or clear) the active object.
    fn set_active(&mut self, id: Option<ObjectId>);

    /// Snapshot of the currently selected objects.
    fn selected(&self) -> Vec<ObjectId>;

    /// Add an object to the selection.
    fn select(&mut self, id: ObjectId);

    /// Remove an object from the selection.
    fn deselect(&mut self, id: ObjectId);

    /// Clear the entire selection.
    fn deselect_all(&mut self);
}
