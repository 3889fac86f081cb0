//! Per-row edit mode for lists with inline editing.

use std::collections::HashMap;
use std::hash::Hash;

/// Whether a single row is shown or being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState<D> {
    Viewing,
    Editing(D),
}

/// Drafts keyed by row id. Rows without an entry are `Viewing`.
#[derive(Debug, Clone)]
pub struct EditStates<K, D> {
    drafts: HashMap<K, D>,
}

impl<K, D> Default for EditStates<K, D> {
    fn default() -> Self {
        Self {
            drafts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, D> EditStates<K, D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter edit mode for `key`, replacing any draft already open.
    pub fn begin(&mut self, key: K, draft: D) {
        self.drafts.insert(key, draft);
    }

    pub fn state(&self, key: &K) -> EditState<&D> {
        match self.drafts.get(key) {
            Some(draft) => EditState::Editing(draft),
            None => EditState::Viewing,
        }
    }

    pub fn is_editing(&self, key: &K) -> bool {
        self.drafts.contains_key(key)
    }

    pub fn draft(&self, key: &K) -> Option<&D> {
        self.drafts.get(key)
    }

    pub fn draft_mut(&mut self, key: &K) -> Option<&mut D> {
        self.drafts.get_mut(key)
    }

    /// Leave edit mode, discarding the draft. Returns false if `key` was
    /// not being edited.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.drafts.remove(key).is_some()
    }

    /// Leave edit mode and hand the draft to the caller for saving.
    pub fn commit(&mut self, key: &K) -> Option<D> {
        self.drafts.remove(key)
    }

    /// Drop drafts for rows that no longer exist.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.drafts.retain(|k, _| keep(k));
    }

    pub fn clear(&mut self) {
        self.drafts.clear();
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}
