//! Voxpaint - sparse voxel structure editing core
//!
//! Interactive construction of a sparse lattice of unit cubes: ray picking,
//! add/delete editing, scoped selection backup, and per-voxel boolean
//! intersection against a reference mesh. Rendering, undo, and persistence
//! are left to the embedding host behind the [`host::Host`] trait.

pub mod core;
pub mod edit;
pub mod host;
pub mod math;
pub mod scene;
pub mod voxel;
