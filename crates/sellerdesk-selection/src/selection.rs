//! Multi-select set used for bulk actions.

use std::collections::HashSet;
use std::hash::Hash;

/// Ids selected in one list view.
///
/// Membership is independent of the list itself; ids of rows that have since
/// disappeared are tolerated until `retain_known` is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K: Eq + Hash> {
    ids: HashSet<K>,
}

impl<K: Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self {
            ids: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Selection<K> {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`; returns `true` when it is now selected.
    pub fn toggle(&mut self, id: K) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Owned variant of [`Selection::toggle`] returning the new set.
    #[must_use]
    pub fn toggled(mut self, id: K) -> Self {
        self.toggle(id);
        self
    }

    /// Replace the selection with `ids`.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = K>) {
        self.ids = ids.into_iter().collect();
    }

    /// Drop every id.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &K) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate selected ids in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.ids.iter()
    }

    /// Forget ids that are no longer in `known`.
    pub fn retain_known<'a>(&mut self, known: impl IntoIterator<Item = &'a K>)
    where
        K: 'a,
    {
        let known: HashSet<&K> = known.into_iter().collect();
        self.ids.retain(|id| known.contains(id));
    }

    /// Whether every id in `known` is selected (false for an empty list).
    #[must_use]
    pub fn is_all_selected<'a>(&self, known: impl IntoIterator<Item = &'a K>) -> bool
    where
        K: 'a,
    {
        let mut any = false;
        for id in known {
            if !self.ids.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Selected ids in list order, for request payloads.
    #[must_use]
    pub fn ordered_in<T>(&self, items: &[T], key: impl Fn(&T) -> Option<K>) -> Vec<K> {
        items
            .iter()
            .filter_map(key)
            .filter(|id| self.ids.contains(id))
            .collect()
    }

    /// Items whose key is selected, in list order.
    #[must_use]
    pub fn pick<'a, T>(&self, items: &'a [T], key: impl Fn(&T) -> Option<K>) -> Vec<&'a T> {
        items
            .iter()
            .filter(|&item| key(item).is_some_and(|id| self.ids.contains(&id)))
            .collect()
    }
}

impl<K: Eq + Hash> FromIterator<K> for Selection<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
