//! Editing session state: array registry and selection handling

pub mod selection;
pub mod session;

pub use selection::{RestoreMode, SelectionBackup};
pub use session::{ArrayId, EditSession};
