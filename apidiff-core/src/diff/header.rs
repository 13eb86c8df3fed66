//! Response and encoding headers.
//!
//! A header omitting `style` is treated as `simple`, the only style headers
//! allow, so spelling it out is not a change.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::{
    non_empty, reconcile, resolved_entries, value_diff, CollectionDiff, ContentDiff, Differ,
    ExamplesDiff, ExtensionsDiff, SchemaDiff, ValueDiff,
};
use crate::openapi::{Header, ReferenceOr};

/// Headers keyed by name.
pub type HeadersDiff = CollectionDiff<String, HeaderDiff>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HeaderDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_diff: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_diff: Option<SchemaDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_diff: Option<ContentDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_diff: Option<ValueDiff<Option<Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples_diff: Option<ExamplesDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

super::empty_when_default!(HeaderDiff);

impl<'a> Differ<'a> {
    pub(crate) fn headers(
        &self,
        base: &IndexMap<String, ReferenceOr<Header>>,
        revision: &IndexMap<String, ReferenceOr<Header>>,
    ) -> Option<HeadersDiff> {
        non_empty(reconcile(
            resolved_entries(self.base, base),
            resolved_entries(self.revision, revision),
            |_, from, to| self.header(from, to),
        ))
    }

    pub(crate) fn header(&self, base: &Header, revision: &Header) -> Option<HeaderDiff> {
        // Headers only support the `simple` style.
        let style = |header: &Header| header.style.clone().unwrap_or_else(|| "simple".to_string());

        non_empty(HeaderDiff {
            description_diff: self.description(&base.description, &revision.description),
            deprecated_diff: value_diff(&base.deprecated, &revision.deprecated),
            required_diff: value_diff(&base.required, &revision.required),
            style_diff: value_diff(&style(base), &style(revision)),
            explode_diff: value_diff(
                &base.explode.unwrap_or(false),
                &revision.explode.unwrap_or(false),
            ),
            schema_diff: self.schema_refs(base.schema.as_ref(), revision.schema.as_ref()),
            content_diff: self.content(&base.content, &revision.content),
            example_diff: self.example(&base.example, &revision.example),
            examples_diff: self.examples(&base.examples, &revision.examples),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        })
    }
}
