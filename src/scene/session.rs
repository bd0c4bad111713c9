//! Edit session owning voxel arrays and the single-select invariant
//!
//! The session is the process-wide editing scope: it registers every voxel
//! array and guarantees that at most one of them is the interactive edit
//! target. Selecting an array scans and clears the flag on all others, so
//! the invariant holds no matter how arrays were flagged before.

use std::collections::HashMap;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::host::{Host, ObjectId};
use crate::voxel::{CancelToken, IntersectionReport, OriginTransform, VoxelArray};

use super::selection::{RestoreMode, SelectionBackup};

/// Unique identifier for a registered voxel array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(pub u64);

/// Registry of voxel arrays plus the scene-wide edit-target selection.
pub struct EditSession {
    arrays: HashMap<ArrayId, VoxelArray>,
    next_id: u64,
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            arrays: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a host anchor object as a new, empty voxel array.
    pub fn add_array(&mut self, anchor: ObjectId, origin: OriginTransform) -> ArrayId {
        let id = ArrayId(self.next_id);
        self.next_id += 1;
        self.arrays.insert(id, VoxelArray::new(anchor, origin));
        id
    }

    /// Remove an array, destroying its voxels and their host objects.
    /// Returns `Ok(false)` if the id is unknown.
    pub fn remove_array(&mut self, host: &mut dyn Host, id: ArrayId) -> Result<bool> {
        let Some(mut array) = self.arrays.remove(&id) else {
            return Ok(false);
        };
        array.clear(host)?;
        Ok(true)
    }

    pub fn array(&self, id: ArrayId) -> Option<&VoxelArray> {
        self.arrays.get(&id)
    }

    pub fn array_mut(&mut self, id: ArrayId) -> Option<&mut VoxelArray> {
        self.arrays.get_mut(&id)
    }

    pub fn array_count(&self) -> usize {
        self.arrays.len()
    }

    pub fn arrays(&self) -> impl Iterator<Item = (ArrayId, &VoxelArray)> {
        self.arrays.iter().map(|(id, a)| (*id, a))
    }

    /// Make one array the interactive edit target, clearing the flag on all
    /// others first. Returns false if the id is unknown (no flags change).
    pub fn select_array(&mut self, id: ArrayId) -> bool {
        if !self.arrays.contains_key(&id) {
            return false;
        }
        for array in self.arrays.values_mut() {
            array.deselect();
        }
        if let Some(array) = self.arrays.get_mut(&id) {
            array.selected = true;
        }
        true
    }

    /// Clear the edit-target flag of one array only. Idempotent.
    pub fn deselect_array(&mut self, id: ArrayId) {
        if let Some(array) = self.arrays.get_mut(&id) {
            array.deselect();
        }
    }

    /// The array currently flagged as edit target, if any.
    pub fn selected_array(&self) -> Option<&VoxelArray> {
        self.arrays.values().find(|a| a.is_selected())
    }

    pub fn selected_array_mut(&mut self) -> Option<&mut VoxelArray> {
        self.arrays.values_mut().find(|a| a.is_selected())
    }

    /// Seed an array with its first voxel and make it the edit target.
    ///
    /// The seeding is wrapped in an append-mode selection backup so the
    /// host-side cube creation leaves the surrounding selection intact.
    pub fn create_voxels(&mut self, host: &mut dyn Host, id: ArrayId) -> Result<()> {
        let Some(array) = self.arrays.get_mut(&id) else {
            return Err(Error::InvalidContext(format!(
                "create voxels on unknown array {id:?}"
            )));
        };

        let backup = SelectionBackup::capture(host, RestoreMode::Append);
        let seeded = array.initialize(host).map(|v| v.handle());
        backup.restore(host);
        seeded?;

        self.select_array(id);
        Ok(())
    }

    /// Run the boolean intersection pass of one array against a reference
    /// object, selection-backed and progress-reported.
    pub fn intersect_with(
        &mut self,
        host: &mut dyn Host,
        id: ArrayId,
        reference: ObjectId,
        progress: &mut dyn FnMut(u8),
        cancel: &CancelToken,
    ) -> Result<IntersectionReport> {
        if !host.exists(reference) {
            return Err(Error::InvalidContext(
                "intersection reference object does not exist".to_string(),
            ));
        }
        let Some(array) = self.arrays.get_mut(&id) else {
            return Err(Error::InvalidContext(format!(
                "intersect on unknown array {id:?}"
            )));
        };
        if array.voxels().any(|v| v.handle() == reference) {
            return Err(Error::InvalidContext(
                "reference object is a voxel of the array itself".to_string(),
            ));
        }

        let backup = SelectionBackup::capture(host, RestoreMode::Full);
        let report = array.run_intersection(host, reference, progress, cancel);
        backup.restore(host);
        report
    }

    /// Host-select every object belonging to one array's voxels (cubes and
    /// intersection results), keeping the previously active object through
    /// an active-only backup. The surrounding selection is extended, not
    /// replaced.
    pub fn select_children(&self, host: &mut dyn Host, id: ArrayId) -> Result<()> {
        let Some(array) = self.arrays.get(&id) else {
            return Err(Error::InvalidContext(format!(
                "select children of unknown array {id:?}"
            )));
        };

        let backup = SelectionBackup::capture(host, RestoreMode::ActiveOnly);
        array.select_children(host);
        backup.restore(host);
        Ok(())
    }

    /// Replace the host selection with one array's intersection results and
    /// make one of them active.
    pub fn select_intersection(&self, host: &mut dyn Host, id: ArrayId) -> Result<()> {
        let Some(array) = self.arrays.get(&id) else {
            return Err(Error::InvalidContext(format!(
                "select intersection of unknown array {id:?}"
            )));
        };

        host.deselect_all();
        let active = array.select_intersection(host);
        host.set_active(active);
        Ok(())
    }

    /// Drop all intersection results of one array, selection-backed.
    pub fn delete_intersection(&mut self, host: &mut dyn Host, id: ArrayId) -> Result<()> {
        let Some(array) = self.arrays.get_mut(&id) else {
            return Err(Error::InvalidContext(format!(
                "delete intersection on unknown array {id:?}"
            )));
        };

        let backup = SelectionBackup::capture(host, RestoreMode::Full);
        let result = array.clear_intersection(host);
        backup.restore(host);
        result
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::MockHost;
    use crate::voxel::LatticePos;

    fn session_with_two_arrays(host: &mut MockHost) -> (EditSession, ArrayId, ArrayId) {
        let mut session = EditSession::new();
        let v = session.add_array(host.spawn(), OriginTransform::identity());
        let w = session.add_array(host.spawn(), OriginTransform::identity());
        (session, v, w)
    }

    #[test]
    fn test_single_select_invariant() {
        let mut host = MockHost::new();
        let (mut session, v, w) = session_with_two_arrays(&mut host);

        assert!(session.select_array(v));
        assert!(session.array(v).unwrap().is_selected());

        assert!(session.select_array(w));
        assert!(!session.array(v).unwrap().is_selected());
        assert!(session.array(w).unwrap().is_selected());
        assert_eq!(session.arrays().filter(|(_, a)| a.is_selected()).count(), 1);
    }

    #[test]
    fn test_select_unknown_array() {
        let mut host = MockHost::new();
        let (mut session, v, _) = session_with_two_arrays(&mut host);
        session.select_array(v);

        assert!(!session.select_array(ArrayId(99)));
        // Existing selection untouched.
        assert!(session.array(v).unwrap().is_selected());
    }

    #[test]
    fn test_deselect_is_local_and_idempotent() {
        let mut host = MockHost::new();
        let (mut session, v, _) = session_with_two_arrays(&mut host);
        session.select_array(v);

        session.deselect_array(v);
        session.deselect_array(v);

        assert!(session.selected_array().is_none());
    }

    #[test]
    fn test_selected_array_resolution() {
        let mut host = MockHost::new();
        let (mut session, _, w) = session_with_two_arrays(&mut host);
        assert!(session.selected_array().is_none());

        session.select_array(w);
        let selected = session.selected_array().unwrap();
        assert_eq!(selected.handle(), session.array(w).unwrap().handle());
    }

    #[test]
    fn test_create_voxels_seeds_and_selects() {
        let mut host = MockHost::new();
        let (mut session, v, _) = session_with_two_arrays(&mut host);

        session.create_voxels(&mut host, v).unwrap();

        let array = session.array(v).unwrap();
        assert!(array.is_created());
        assert!(array.is_selected());
        assert_eq!(array.len(), 1);
        assert!(array.lookup(LatticePos::new(0, 0, 1)).is_some());
    }

    #[test]
    fn test_create_voxels_preserves_selection() {
        let mut host = MockHost::new();
        let outside = host.spawn();
        let (mut session, v, _) = session_with_two_arrays(&mut host);
        host.select(outside);
        host.set_active(Some(outside));

        session.create_voxels(&mut host, v).unwrap();

        assert!(host.is_selected(outside));
        assert_eq!(host.active, Some(outside));
    }

    #[test]
    fn test_create_voxels_unknown_array() {
        let mut host = MockHost::new();
        let mut session = EditSession::new();
        let err = session.create_voxels(&mut host, ArrayId(7)).unwrap_err();
        assert!(matches!(err, Error::InvalidContext(_)));
    }

    #[test]
    fn test_remove_array_destroys_host_objects() {
        let mut host = MockHost::new();
        let (mut session, v, _) = session_with_two_arrays(&mut host);
        session.create_voxels(&mut host, v).unwrap();
        let handle = session
            .array(v)
            .unwrap()
            .lookup(LatticePos::new(0, 0, 1))
            .unwrap()
            .handle();

        assert!(session.remove_array(&mut host, v).unwrap());
        assert!(!host.exists(handle));
        assert_eq!(session.array_count(), 1);
        assert!(!session.remove_array(&mut host, v).unwrap());
    }

    #[test]
    fn test_intersect_with_rejects_bad_reference() {
        let mut host = MockHost::new();
        let (mut session, v, _) = session_with_two_arrays(&mut host);
        session.create_voxels(&mut host, v).unwrap();

        // Nonexistent reference.
        let err = session
            .intersect_with(
                &mut host,
                v,
                ObjectId(999),
                &mut |_| {},
                &CancelToken::new(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidContext(_)));

        // A voxel of the array itself.
        let own_cube = session
            .array(v)
            .unwrap()
            .lookup(LatticePos::new(0, 0, 1))
            .unwrap()
            .handle();
        let err = session
            .intersect_with(&mut host, v, own_cube, &mut |_| {}, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidContext(_)));
    }

    #[test]
    fn test_intersect_with_restores_selection() {
        let mut host = MockHost::new();
        let (mut session, v, _) = session_with_two_arrays(&mut host);
        session.create_voxels(&mut host, v).unwrap();
        let reference = host.spawn();
        host.select(reference);
        host.set_active(Some(reference));

        let report = session
            .intersect_with(&mut host, v, reference, &mut |_| {}, &CancelToken::new())
            .unwrap();

        assert_eq!(report.completed, 1);
        assert!(host.is_selected(reference));
        assert_eq!(host.active, Some(reference));
        assert!(session.array(v).unwrap().is_intersected());
    }

    #[test]
    fn test_delete_intersection_via_session() {
        let mut host = MockHost::new();
        let (mut session, v, _) = session_with_two_arrays(&mut host);
        session.create_voxels(&mut host, v).unwrap();
        let reference = host.spawn();
        session
            .intersect_with(&mut host, v, reference, &mut |_| {}, &CancelToken::new())
            .unwrap();

        session.delete_intersection(&mut host, v).unwrap();

        let array = session.array(v).unwrap();
        assert!(!array.is_intersected());
        assert!(array.voxels().all(|x| x.intersection().is_none()));
    }

    #[test]
    fn test_select_children_selects_voxels_and_results() {
        let mut host = MockHost::new();
        let (mut session, v, _) = session_with_two_arrays(&mut host);
        session.create_voxels(&mut host, v).unwrap();
        session
            .array_mut(v)
            .unwrap()
            .create_voxel(&mut host, LatticePos::new(1, 0, 1))
            .unwrap();
        let reference = host.spawn();
        session
            .intersect_with(&mut host, v, reference, &mut |_| {}, &CancelToken::new())
            .unwrap();

        let outside = host.spawn();
        host.select(outside);
        host.set_active(Some(outside));
        let deselects_before = host.deselect_all_calls;

        session.select_children(&mut host, v).unwrap();

        for voxel in session.array(v).unwrap().voxels() {
            assert!(host.is_selected(voxel.handle()));
            assert!(host.is_selected(voxel.intersection().unwrap()));
        }
        // Active-only backup: the surrounding selection is extended, never
        // cleared, and the active object comes back.
        assert!(host.is_selected(outside));
        assert_eq!(host.active, Some(outside));
        assert_eq!(host.deselect_all_calls, deselects_before);
    }

    #[test]
    fn test_select_intersection_replaces_selection() {
        let mut host = MockHost::new();
        let (mut session, v, _) = session_with_two_arrays(&mut host);
        session.create_voxels(&mut host, v).unwrap();
        session
            .array_mut(v)
            .unwrap()
            .create_voxel(&mut host, LatticePos::new(1, 0, 1))
            .unwrap();
        let reference = host.spawn();
        session
            .intersect_with(&mut host, v, reference, &mut |_| {}, &CancelToken::new())
            .unwrap();

        let outside = host.spawn();
        host.select(outside);
        host.set_active(Some(outside));

        session.select_intersection(&mut host, v).unwrap();

        let array = session.array(v).unwrap();
        for voxel in array.voxels() {
            assert!(!host.is_selected(voxel.handle()));
            assert!(host.is_selected(voxel.intersection().unwrap()));
        }
        assert!(!host.is_selected(outside));
        // Active is the result of the lowest lattice position.
        let seed_result = array
            .lookup(LatticePos::new(0, 0, 1))
            .unwrap()
            .intersection()
            .unwrap();
        assert_eq!(host.active, Some(seed_result));
    }

    #[test]
    fn test_select_children_unknown_array() {
        let mut host = MockHost::new();
        let session = EditSession::new();
        let err = session.select_children(&mut host, ArrayId(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidContext(_)));
        let err = session
            .select_intersection(&mut host, ArrayId(3))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidContext(_)));
    }
}
