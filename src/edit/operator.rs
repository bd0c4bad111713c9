//! Modal voxel editing operator
//!
//! An explicit finite state machine driven by the host's event dispatch:
//! the host calls `handle_event` once per event, each event is handled to
//! completion, and the machine never blocks between events. Every mutating
//! action is wrapped in a full selection backup so the pick-and-edit churn
//! stays invisible to the surrounding selection state.

use super::event::{EditEvent, PickRay, Surface, Transition};
use crate::core::error::Error;
use crate::core::types::Result;
use crate::host::{Host, ObjectId};
use crate::scene::selection::{RestoreMode, SelectionBackup};
use crate::scene::session::EditSession;
use crate::voxel::{LatticePos, VoxelRayIntersection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Modal,
    Done,
}

/// Modal controller turning pointer events into pick / add / delete actions.
#[derive(Debug)]
pub struct EditOperator {
    state: State,
}

impl EditOperator {
    /// Begin editing. Fails with [`Error::InvalidContext`] outside a 3d
    /// viewport, mutating nothing.
    pub fn invoke(surface: Surface) -> Result<Self> {
        if surface != Surface::Viewport3d {
            return Err(Error::InvalidContext(
                "active surface must be a 3d viewport".to_string(),
            ));
        }
        Ok(Self {
            state: State::Modal,
        })
    }

    /// Handle one event to completion.
    ///
    /// Navigation passes through untouched. A secondary release that hits
    /// empty space aborts the operator: unlike add, a missed delete is
    /// treated as operator cancellation so the user gets clear feedback.
    /// Host primitive failures propagate after the selection backup has
    /// been released.
    pub fn handle_event(
        &mut self,
        session: &mut EditSession,
        host: &mut dyn Host,
        event: EditEvent,
    ) -> Result<Transition> {
        if self.state == State::Done {
            return Ok(Transition::Finished);
        }

        match event {
            EditEvent::Navigation => Ok(Transition::PassThrough),
            EditEvent::PrimaryRelease(ray) => {
                self.add_voxel(session, host, ray)?;
                Ok(Transition::RunningModal)
            }
            EditEvent::SecondaryRelease(ray) => {
                if self.delete_voxel(session, host, ray)? {
                    Ok(Transition::RunningModal)
                } else {
                    self.state = State::Done;
                    Ok(Transition::Cancelled)
                }
            }
            EditEvent::Cancel => {
                self.state = State::Done;
                Ok(Transition::Cancelled)
            }
            EditEvent::Other => Ok(Transition::RunningModal),
        }
    }

    /// Nearest hit of the pick ray in the session's selected array.
    fn pick(session: &EditSession, ray: PickRay) -> Option<VoxelRayIntersection> {
        session.selected_array()?.cast_ray(ray.origin, ray.target)
    }

    /// Add a voxel adjacent to the picked face, one lattice step outward
    /// along its normal, then select it. Returns the new position, or
    /// `None` when the pick missed, no array is selected, or the adjacent
    /// slot is already occupied.
    pub fn add_voxel(
        &mut self,
        session: &mut EditSession,
        host: &mut dyn Host,
        ray: PickRay,
    ) -> Result<Option<LatticePos>> {
        let backup = SelectionBackup::capture(host, RestoreMode::Full);

        let created: Result<Option<(LatticePos, ObjectId)>> = match Self::pick(session, ray) {
            Some(hit) => {
                let pos = hit.position.step_along(hit.normal);
                match session.selected_array_mut() {
                    Some(array) => match array.create_voxel(host, pos) {
                        Ok(voxel) => Ok(Some((pos, voxel.handle()))),
                        Err(Error::PositionOccupied(p)) => {
                            log::debug!("add voxel: {p} already occupied");
                            Ok(None)
                        }
                        Err(err) => Err(err),
                    },
                    None => Ok(None),
                }
            }
            None => Ok(None),
        };

        backup.restore(host);

        match created? {
            Some((pos, handle)) => {
                host.select(handle);
                host.set_active(Some(handle));
                Ok(Some(pos))
            }
            None => Ok(None),
        }
    }

    /// Delete the picked voxel. Returns whether anything was removed.
    pub fn delete_voxel(
        &mut self,
        session: &mut EditSession,
        host: &mut dyn Host,
        ray: PickRay,
    ) -> Result<bool> {
        let backup = SelectionBackup::capture(host, RestoreMode::Full);

        let deleted = match Self::pick(session, ray) {
            Some(hit) => match session.selected_array_mut() {
                Some(array) => array.delete_voxel(host, hit.position),
                None => Ok(false),
            },
            None => Ok(false),
        };

        backup.restore(host);
        deleted
    }

    /// Select the picked voxel without mutating the array. Returns the
    /// selected voxel's host handle, if any.
    pub fn select_voxel(
        &mut self,
        session: &EditSession,
        host: &mut dyn Host,
        ray: PickRay,
    ) -> Option<ObjectId> {
        let backup = SelectionBackup::capture(host, RestoreMode::Full);
        let hit = Self::pick(session, ray);
        backup.restore(host);

        let handle = session.selected_array()?.lookup(hit?.position)?.handle();
        host.select(handle);
        host.set_active(Some(handle));
        Some(handle)
    }
}
