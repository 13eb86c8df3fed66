//! Responses keyed by status code, with their headers and content.

use indexmap::IndexMap;
use serde::Serialize;

use super::{
    non_empty, reconcile, resolved_entries, CollectionDiff, ContentDiff, Differ, ExtensionsDiff,
    HeadersDiff, ValueDiff,
};
use crate::openapi::{ReferenceOr, Response};

/// Responses keyed by status code (`200`, `4XX`, `default`).
pub type ResponsesDiff = CollectionDiff<String, ResponseDiff>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResponseDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers_diff: Option<HeadersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_diff: Option<ContentDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

super::empty_when_default!(ResponseDiff);

impl<'a> Differ<'a> {
    pub(crate) fn responses(
        &self,
        base: &IndexMap<String, ReferenceOr<Response>>,
        revision: &IndexMap<String, ReferenceOr<Response>>,
    ) -> Option<ResponsesDiff> {
        non_empty(reconcile(
            resolved_entries(self.base, base),
            resolved_entries(self.revision, revision),
            |_, from, to| self.response(from, to),
        ))
    }

    pub(crate) fn response(&self, base: &Response, revision: &Response) -> Option<ResponseDiff> {
        // The description is a required string; compared as text like any other.
        let description = self.description(
            &Some(base.description.clone()),
            &Some(revision.description.clone()),
        );

        non_empty(ResponseDiff {
            description_diff: description,
            headers_diff: self.headers(&base.headers, &revision.headers),
            content_diff: self.content(&base.content, &revision.content),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        })
    }
}
