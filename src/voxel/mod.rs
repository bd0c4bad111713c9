//! Sparse voxel entities and storage

pub mod array;
pub mod lattice;
pub mod record;
pub mod voxel;

pub use array::{CancelToken, IntersectionReport, OriginTransform, VoxelArray};
pub use lattice::{LATTICE_STEP, LatticePos};
pub use record::{ArrayRecord, VoxelRecord};
pub use voxel::{DrawType, Voxel, VoxelRayIntersection};
