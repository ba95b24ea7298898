//! Slot selection state.

use crate::model::SlotId;

/// The current selection: an ordered id set plus the primary slot (the one
/// whose handles are shown and that anchors drags).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    ids: Vec<SlotId>,
    primary: Option<SlotId>,
}

impl Selection {
    /// Selected ids in selection order.
    pub fn ids(&self) -> &[SlotId] {
        &self.ids
    }

    pub fn primary(&self) -> Option<SlotId> {
        self.primary
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_selected(&self, id: SlotId) -> bool {
        self.ids.contains(&id)
    }

    /// Click-select. With `multi` the id toggles in and out of the set;
    /// without, it becomes the sole selection.
    pub fn select(&mut self, id: SlotId, multi: bool) {
        if !multi {
            self.select_only(id);
            return;
        }
        if let Some(idx) = self.ids.iter().position(|&i| i == id) {
            self.ids.remove(idx);
            if self.primary == Some(id) {
                self.primary = self.ids.last().copied();
            }
        } else {
            self.ids.push(id);
            self.primary = Some(id);
        }
    }

    pub fn select_only(&mut self, id: SlotId) {
        self.ids = vec![id];
        self.primary = Some(id);
    }

    /// Extends the selection without toggling; ids already present keep
    /// their position.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = SlotId>) {
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
        if self.primary.is_none() {
            self.primary = self.ids.last().copied();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.primary = None;
    }

    /// Drops ids that no longer resolve to a slot.
    pub fn retain(&mut self, mut keep: impl FnMut(SlotId) -> bool) {
        self.ids.retain(|&id| keep(id));
        if let Some(p) = self.primary {
            if !self.ids.contains(&p) {
                self.primary = self.ids.last().copied();
            }
        }
    }
}
