//! Error types for the voxel editing core

use thiserror::Error;

use crate::voxel::lattice::LatticePos;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// A voxel already occupies the target lattice slot. Recoverable; the
    /// caller decides whether to abort or pick another position.
    #[error("lattice position {0} is already occupied")]
    PositionOccupied(LatticePos),

    /// No voxel at the given position where one was required.
    #[error("no voxel at {0}")]
    NotFound(LatticePos),

    /// An operation was invoked outside a valid editing context.
    #[error("invalid context: {0}")]
    InvalidContext(String),

    /// The host boolean operation failed for one voxel.
    #[error("boolean intersection failed at {position}: {reason}")]
    IntersectionFailed {
        position: LatticePos,
        reason: String,
    },

    /// A host collaborator call failed. Propagated immediately.
    #[error("host error: {0}")]
    Host(String),
}
