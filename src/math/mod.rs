//! Geometric primitives for voxel picking

pub mod aabb;
pub mod ray;

pub use aabb::Aabb;
pub use ray::Ray;
