//! Scoped backup and restore of host selection state
//!
//! Compound edit operations select and deselect objects internally; wrapping
//! them in a `SelectionBackup` makes them transactionally invisible to the
//! surrounding selection UI on both success and failure paths.

use crate::host::{Host, ObjectId};

/// What `restore` puts back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreMode {
    /// Deselect everything, then reselect the captured set and active object.
    Full,
    /// Reselect the captured set on top of whatever is selected now.
    Append,
    /// Restore only the active-object pointer; the selection is untouched.
    ActiveOnly,
}

/// Snapshot of the host selection, consumed exactly once by `restore`.
#[derive(Debug)]
pub struct SelectionBackup {
    mode: RestoreMode,
    active: Option<ObjectId>,
    selected: Vec<ObjectId>,
}

impl SelectionBackup {
    /// Capture the current active object and, unless `ActiveOnly`, the full
    /// selected set.
    pub fn capture(host: &dyn Host, mode: RestoreMode) -> Self {
        let selected = if mode == RestoreMode::ActiveOnly {
            Vec::new()
        } else {
            host.selected()
        };
        Self {
            mode,
            active: host.active(),
            selected,
        }
    }

    /// Put the captured state back. Captured objects that no longer exist
    /// are skipped silently; a vanished active object restores to none.
    ///
    /// Consumes the backup, so a second restore is unrepresentable.
    pub fn restore(self, host: &mut dyn Host) {
        let active = self.active.filter(|id| host.exists(*id));

        if self.mode == RestoreMode::ActiveOnly {
            host.set_active(active);
            return;
        }

        if self.mode == RestoreMode::Full {
            host.deselect_all();
        }
        for id in &self.selected {
            if host.exists(*id) {
                host.select(*id);
            }
        }
        host.set_active(active);
    }
}
