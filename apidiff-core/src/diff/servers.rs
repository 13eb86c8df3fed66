//! Servers are matched by URL.

use serde::Serialize;

use super::{
    entries, non_empty, reconcile, value_diff, CollectionDiff, Differ, ExtensionsDiff, ListDiff,
    ValueDiff,
};
use crate::openapi::{Server, ServerVariable};

/// Servers keyed by URL.
pub type ServersDiff = CollectionDiff<String, ServerDiff>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ServerDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables_diff: Option<CollectionDiff<String, VariableDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VariableDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_diff: Option<ListDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_diff: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
}

super::empty_when_default!(ServerDiff, VariableDiff);

impl<'a> Differ<'a> {
    pub(crate) fn servers(&self, base: &[Server], revision: &[Server]) -> Option<ServersDiff> {
        non_empty(reconcile(
            base.iter().map(|server| (server.url.clone(), server)),
            revision.iter().map(|server| (server.url.clone(), server)),
            |_, from, to| self.server(from, to),
        ))
    }

    fn server(&self, base: &Server, revision: &Server) -> Option<ServerDiff> {
        non_empty(ServerDiff {
            description_diff: self.description(&base.description, &revision.description),
            variables_diff: non_empty(reconcile(
                entries(&base.variables),
                entries(&revision.variables),
                |_, from, to| self.server_variable(from, to),
            )),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        })
    }

    fn server_variable(
        &self,
        base: &ServerVariable,
        revision: &ServerVariable,
    ) -> Option<VariableDiff> {
        non_empty(VariableDiff {
            enum_diff: non_empty(ListDiff::between(&base.enumeration, &revision.enumeration)),
            default_diff: value_diff(&base.default, &revision.default),
            description_diff: self.description(&base.description, &revision.description),
        })
    }
}
