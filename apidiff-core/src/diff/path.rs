//! Paths and the operations under them.
//!
//! This is where the path filter, extension filter and path prefix apply.
//! Filtered paths and operations are dropped from both sides before
//! reconciling, so they are neither added, deleted nor modified.

use indexmap::IndexMap;
use serde::Serialize;

use super::{
    non_empty, reconcile, CollectionDiff, Differ, ExtensionsDiff, OperationsDiff, ParametersDiff,
    ServersDiff, ValueDiff,
};
use crate::config::Config;
use crate::openapi::{Operation, PathItem};

/// Paths keyed by template. Added paths keep the revision's spelling; the
/// others use the base document's.
pub type PathsDiff = CollectionDiff<String, PathDiff>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PathDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations_diff: Option<OperationsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_diff: Option<ParametersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers_diff: Option<ServersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

super::empty_when_default!(PathDiff);

impl<'a> Differ<'a> {
    pub(crate) fn paths(
        &self,
        base: &IndexMap<String, PathItem>,
        revision: &IndexMap<String, PathItem>,
    ) -> Option<PathsDiff> {
        let config = self.config;
        let visible = |path: &str, item: &PathItem| {
            config.includes_path(path) && !config.excludes(&item.extensions)
        };

        let base_paths = base
            .iter()
            .filter(|(path, item)| visible(path.as_str(), *item))
            .map(|(path, item)| (path.clone(), item));

        // Remapped key -> (revision spelling, item). A prefixed path wins over
        // an unprefixed one mapping to the same key.
        let mut remapped: IndexMap<&str, (&str, &PathItem)> = IndexMap::new();
        for (path, item) in revision {
            let key = config.unprefixed(path);
            if !visible(key, item) {
                continue;
            }
            let prefixed = key.len() != path.len();
            if let Some((existing, _)) = remapped.get(key) {
                let (dropped, kept) = if prefixed {
                    (*existing, path.as_str())
                } else {
                    (path.as_str(), *existing)
                };
                tracing::debug!(dropped, kept, "revision paths map to the same key");
                if !prefixed {
                    continue;
                }
            }
            remapped.insert(key, (path.as_str(), item));
        }
        let revision_paths = remapped.iter().map(|(key, (_, item))| (key.to_string(), *item));

        let mut diff = reconcile(base_paths, revision_paths, |_, from, to| self.path(from, to));
        for added in &mut diff.added {
            if let Some((original, _)) = remapped.get(added.as_str()) {
                *added = original.to_string();
            }
        }
        non_empty(diff)
    }

    fn path(&self, base: &PathItem, revision: &PathItem) -> Option<PathDiff> {
        non_empty(PathDiff {
            summary_diff: self.description(&base.summary, &revision.summary),
            description_diff: self.description(&base.description, &revision.description),
            operations_diff: self.operations(base, revision),
            parameters_diff: self.parameters(&base.parameters, &revision.parameters),
            servers_diff: self.servers(&base.servers, &revision.servers),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        })
    }

    fn operations(&self, base: &PathItem, revision: &PathItem) -> Option<OperationsDiff> {
        non_empty(reconcile(
            visible_operations(self.config, base),
            visible_operations(self.config, revision),
            |_, from, to| self.operation(from, to),
        ))
    }
}

fn visible_operations<'p>(
    config: &'p Config,
    item: &'p PathItem,
) -> impl Iterator<Item = (String, &'p Operation)> {
    item.operations()
        .filter(move |(_, operation)| !config.excludes(&operation.extensions))
        .map(|(method, operation)| (method.to_string(), operation))
}
