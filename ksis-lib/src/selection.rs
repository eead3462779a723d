//! Row selection keyed by durable ids.

use std::collections::HashSet;
use std::hash::Hash;

/// The set of rows a user has checked.
///
/// Ids survive paging and refetches, so a row checked on page 1 is still
/// checked after visiting page 2 and coming back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTracker<Id: Eq + Hash> {
    selected: HashSet<Id>,
}

impl<Id: Eq + Hash + Clone> SelectionTracker<Id> {
    /// An empty selection.
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }

    /// Adds `id` if absent, removes it otherwise.
    pub fn toggle(&mut self, id: Id) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Replaces the selection with exactly `visible`.
    pub fn select_all_visible<I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = Id>,
    {
        self.selected = visible.into_iter().collect();
    }

    /// Unchecking "select all" empties the whole selection, not only the
    /// visible rows.
    pub fn clear_visible(&mut self) {
        self.clear();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    /// The selected ids, in no particular order.
    pub fn selected_ids(&self) -> &HashSet<Id> {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// State of the "select all" checkbox: every visible row is selected.
    ///
    /// `false` when nothing is visible.
    pub fn all_visible_selected<'a, I>(&self, visible: I) -> bool
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        let mut any = false;
        for id in visible {
            if !self.selected.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }
}

impl<Id: Eq + Hash + Clone> Default for SelectionTracker<Id> {
    fn default() -> Self {
        Self::new()
    }
}
