//! Folding partial server results back into a locally held list.
//!
//! The list is read once and a new vector is returned; callers swap it in
//! with a single assignment so no reader ever sees a half-merged list.

use std::collections::HashMap;
use std::hash::Hash;

use sellerdesk_api_models::Record;

use crate::normalize::ID_FIELDS;

/// Items that can absorb a partial update of the same shape.
pub trait Mergeable: Clone {
    /// Copy of `self` with every field present in `update` overwritten.
    #[must_use]
    fn merged_with(&self, update: &Self) -> Self;
}

impl Mergeable for Record {
    fn merged_with(&self, update: &Self) -> Self {
        let mut next = self.clone();
        for (field, value) in update {
            if ID_FIELDS.contains(&field.as_str()) && self.contains_key(field) {
                continue;
            }
            next.insert(field.clone(), value.clone());
        }
        next
    }
}

/// Merge `updates` into `list` by key.
///
/// Length and order of `list` are preserved. Items without a matching update
/// are cloned unchanged, updates without a matching item are dropped, and
/// several updates for one key apply in sequence.
#[must_use]
pub fn merge_updates<T, K, F>(list: &[T], updates: &[T], key: F) -> Vec<T>
where
    T: Mergeable,
    K: Eq + Hash,
    F: Fn(&T) -> Option<K>,
{
    let mut by_key: HashMap<K, Vec<&T>> = HashMap::new();
    for update in updates {
        if let Some(id) = key(update) {
            by_key.entry(id).or_default().push(update);
        }
    }

    list.iter()
        .map(|item| match key(item).and_then(|id| by_key.get(&id)) {
            Some(pending) => pending
                .iter()
                .fold(item.clone(), |acc, update| acc.merged_with(update)),
            None => item.clone(),
        })
        .collect()
}
