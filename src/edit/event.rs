//! Events consumed by the modal voxel editor

use crate::core::types::Vec3;

/// World-space pick segment, resolved by the host from a screen coordinate
/// (view origin through the pointer, extended to the far clip).
#[derive(Clone, Copy, Debug)]
pub struct PickRay {
    pub origin: Vec3,
    pub target: Vec3,
}

impl PickRay {
    pub fn new(origin: Vec3, target: Vec3) -> Self {
        Self { origin, target }
    }
}

/// Editing surface the operator is invoked from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Viewport3d,
    Properties,
    Other,
}

/// One pointer or key event, already mapped by the host dispatch.
#[derive(Clone, Copy, Debug)]
pub enum EditEvent {
    /// Camera navigation (orbit, pan, zoom). Never intercepted.
    Navigation,
    /// Primary button released over the viewport: add a voxel.
    PrimaryRelease(PickRay),
    /// Secondary button released over the viewport: delete a voxel.
    SecondaryRelease(PickRay),
    /// Abort editing (e.g. Escape).
    Cancel,
    /// Any other event; consumed without effect.
    Other,
}

/// What the host dispatch should do after an event was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Event consumed; keep feeding events to the operator.
    RunningModal,
    /// Event must be forwarded to the host unchanged.
    PassThrough,
    /// The operator aborted; stop feeding it events.
    Cancelled,
    /// The operator already terminated earlier.
    Finished,
}
