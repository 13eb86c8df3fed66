use serde_json::Value;

use super::{entries, non_empty, reconcile, value_diff, CollectionDiff, Differ, ValueDiff};
use crate::openapi::Extensions;

/// `x-` extensions keyed by name; values are compared as opaque JSON.
pub type ExtensionsDiff = CollectionDiff<String, ValueDiff<Value>>;

impl<'a> Differ<'a> {
    pub(crate) fn extensions(&self, base: &Extensions, revision: &Extensions) -> Option<ExtensionsDiff> {
        non_empty(reconcile(entries(&base.0), entries(&revision.0), |_, from, to| {
            value_diff(from, to)
        }))
    }
}
