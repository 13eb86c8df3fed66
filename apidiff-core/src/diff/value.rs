//! Leaf-level diffs: a changed value and a changed list of values.

use serde::Serialize;

use super::Empty;

/// A value that differs between base and revision.
///
/// Only ever constructed when `from != to`, so a `ValueDiff` is never empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValueDiff<T> {
    pub from: T,
    pub to: T,
}

impl<T: PartialEq> ValueDiff<T> {
    /// `None` when the two values are equal.
    pub fn new(from: T, to: T) -> Option<Self> {
        if from == to {
            None
        } else {
            Some(ValueDiff { from, to })
        }
    }
}

impl<T> Empty for ValueDiff<T> {
    fn is_empty(&self) -> bool {
        false
    }
}

/// Compare two borrowed values, cloning them into a [`ValueDiff`] if they differ.
pub fn value_diff<T: PartialEq + Clone>(from: &T, to: &T) -> Option<ValueDiff<T>> {
    if from == to {
        None
    } else {
        Some(ValueDiff {
            from: from.clone(),
            to: to.clone(),
        })
    }
}

/// Membership changes of an unkeyed list such as `enum` or `required`.
///
/// `added` keeps revision order, `deleted` keeps base order. Duplicates in
/// the input are reported once.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListDiff<T> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<T>,
}

impl<T> Default for ListDiff<T> {
    fn default() -> Self {
        ListDiff {
            added: Vec::new(),
            deleted: Vec::new(),
        }
    }
}

impl<T> Empty for ListDiff<T> {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

impl<T: PartialEq + Clone> ListDiff<T> {
    pub fn between(base: &[T], revision: &[T]) -> Self {
        ListDiff {
            added: missing_from(revision, base),
            deleted: missing_from(base, revision),
        }
    }
}

/// Items of `from` that do not occur in `other`, first occurrence only.
fn missing_from<T: PartialEq + Clone>(from: &[T], other: &[T]) -> Vec<T> {
    let mut missing: Vec<T> = Vec::new();
    for item in from {
        if !other.contains(item) && !missing.contains(item) {
            missing.push(item.clone());
        }
    }
    missing
}
