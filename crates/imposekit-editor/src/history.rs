//! Linear undo/redo over whole-model snapshots.
//!
//! Every committed edit pushes a deep copy of the layout plus the selection.
//! Undo/redo walk a cursor over the snapshot list; pushing after an undo
//! discards the redo tail. No diffing, no command replay.

use crate::model::Layout;
use crate::selection::Selection;

/// Maximum number of snapshots retained; the oldest is evicted beyond this.
pub const HISTORY_CAPACITY: usize = 50;

/// One restorable point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub layout: Layout,
    pub selection: Selection,
}

/// The snapshot stack. The cursor points at the snapshot matching the
/// current model state.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    /// Starts a history with the given initial state as its baseline.
    pub fn new(layout: &Layout, selection: &Selection) -> Self {
        Self {
            snapshots: vec![Snapshot {
                layout: layout.clone(),
                selection: selection.clone(),
            }],
            cursor: 0,
        }
    }

    /// Records the state after a committed edit. Anything beyond the cursor
    /// (the redo tail) is discarded first.
    pub fn push(&mut self, layout: &Layout, selection: &Selection) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(Snapshot {
            layout: layout.clone(),
            selection: selection.clone(),
        });
        if self.snapshots.len() > HISTORY_CAPACITY {
            self.snapshots.remove(0);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Steps the cursor back and returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].clone())
    }

    /// Steps the cursor forward and returns the snapshot to restore.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].clone())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
