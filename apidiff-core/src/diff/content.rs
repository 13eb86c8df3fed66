//! Media type maps (`content`), their encodings and named examples.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::{
    entries, non_empty, reconcile, resolved_entries, value_diff, CollectionDiff, Differ,
    ExtensionsDiff, HeadersDiff, SchemaDiff, ValueDiff,
};
use crate::openapi::{Encoding, Example, MediaType, ReferenceOr};

/// Media types keyed by content type, e.g. `application/json`.
pub type ContentDiff = CollectionDiff<String, MediaTypeDiff>;

/// Named examples keyed by name.
pub type ExamplesDiff = CollectionDiff<String, ExampleDiff>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MediaTypeDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_diff: Option<SchemaDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_diff: Option<ValueDiff<Option<Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples_diff: Option<ExamplesDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding_diff: Option<CollectionDiff<String, EncodingDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EncodingDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers_diff: Option<HeadersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_diff: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_reserved_diff: Option<ValueDiff<bool>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExampleDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_diff: Option<ValueDiff<Option<Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_value_diff: Option<ValueDiff<Option<String>>>,
}

super::empty_when_default!(MediaTypeDiff, EncodingDiff, ExampleDiff);

/// Encodings default to `form` style, which is what multipart and
/// url-encoded bodies use.
const DEFAULT_ENCODING_STYLE: &str = "form";

impl<'a> Differ<'a> {
    pub(crate) fn content(
        &self,
        base: &IndexMap<String, MediaType>,
        revision: &IndexMap<String, MediaType>,
    ) -> Option<ContentDiff> {
        non_empty(reconcile(entries(base), entries(revision), |_, from, to| {
            self.media_type(from, to)
        }))
    }

    fn media_type(&self, base: &MediaType, revision: &MediaType) -> Option<MediaTypeDiff> {
        non_empty(MediaTypeDiff {
            schema_diff: self.schema_refs(base.schema.as_ref(), revision.schema.as_ref()),
            example_diff: self.example(&base.example, &revision.example),
            examples_diff: self.examples(&base.examples, &revision.examples),
            encoding_diff: non_empty(reconcile(
                entries(&base.encoding),
                entries(&revision.encoding),
                |_, from, to| self.encoding(from, to),
            )),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        })
    }

    fn encoding(&self, base: &Encoding, revision: &Encoding) -> Option<EncodingDiff> {
        let style = |encoding: &Encoding| {
            encoding
                .style
                .clone()
                .unwrap_or_else(|| DEFAULT_ENCODING_STYLE.to_string())
        };

        non_empty(EncodingDiff {
            content_type_diff: value_diff(&base.content_type, &revision.content_type),
            headers_diff: self.headers(&base.headers, &revision.headers),
            style_diff: value_diff(&style(base), &style(revision)),
            explode_diff: value_diff(
                &base.explode.unwrap_or(false),
                &revision.explode.unwrap_or(false),
            ),
            allow_reserved_diff: value_diff(&base.allow_reserved, &revision.allow_reserved),
        })
    }

    /// Named examples. Skipped entirely when examples are excluded.
    pub(crate) fn examples(
        &self,
        base: &IndexMap<String, ReferenceOr<Example>>,
        revision: &IndexMap<String, ReferenceOr<Example>>,
    ) -> Option<ExamplesDiff> {
        if self.config.exclude_examples {
            return None;
        }
        non_empty(reconcile(
            resolved_entries(self.base, base),
            resolved_entries(self.revision, revision),
            |_, from, to| self.named_example(from, to),
        ))
    }

    fn named_example(&self, base: &Example, revision: &Example) -> Option<ExampleDiff> {
        non_empty(ExampleDiff {
            summary_diff: self.description(&base.summary, &revision.summary),
            description_diff: self.description(&base.description, &revision.description),
            value_diff: value_diff(&base.value, &revision.value),
            external_value_diff: value_diff(&base.external_value, &revision.external_value),
        })
    }
}
