//! Interactive voxel editing state machine

pub mod event;
pub mod operator;

pub use event::{EditEvent, PickRay, Surface, Transition};
pub use operator::EditOperator;
