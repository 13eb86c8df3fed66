//! Keyed collection reconciliation.

use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;

use super::Empty;

/// Membership and per-key changes of a keyed collection.
///
/// A key lands in at most one bucket. `added` follows revision order;
/// `deleted` and `modified` follow base order.
#[derive(Clone, Debug, Serialize)]
pub struct CollectionDiff<K, D> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<K>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<K>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub modified: IndexMap<K, D>,
}

impl<K, D> Default for CollectionDiff<K, D> {
    fn default() -> Self {
        CollectionDiff {
            added: Vec::new(),
            deleted: Vec::new(),
            modified: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, D: PartialEq> PartialEq for CollectionDiff<K, D> {
    fn eq(&self, other: &Self) -> bool {
        self.added == other.added && self.deleted == other.deleted && self.modified == other.modified
    }
}

impl<K, D> Empty for CollectionDiff<K, D> {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

/// Reconcile two keyed collections.
///
/// `compare` is called once for every key present on both sides and returns
/// `None` when the two values are equivalent. A key repeated within one side
/// keeps its last value.
pub fn reconcile<K, V, D, B, R, F>(base: B, revision: R, mut compare: F) -> CollectionDiff<K, D>
where
    K: Hash + Eq + Clone,
    V: Copy,
    B: IntoIterator<Item = (K, V)>,
    R: IntoIterator<Item = (K, V)>,
    F: FnMut(&K, V, V) -> Option<D>,
{
    let base: IndexMap<K, V> = base.into_iter().collect();
    let revision: IndexMap<K, V> = revision.into_iter().collect();

    let mut diff = CollectionDiff::default();
    for key in revision.keys() {
        if !base.contains_key(key) {
            diff.added.push(key.clone());
        }
    }
    for (key, &from) in &base {
        match revision.get(key) {
            None => diff.deleted.push(key.clone()),
            Some(&to) => {
                if let Some(changed) = compare(key, from, to) {
                    diff.modified.insert(key.clone(), changed);
                }
            }
        }
    }
    diff
}
