//! Request body comparison.

use serde::Serialize;

use super::{non_empty, value_diff, ContentDiff, Differ, ExtensionsDiff, ValueDiff};
use crate::openapi::RequestBody;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RequestBodyDiff {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub body_added: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub body_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_diff: Option<ContentDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

super::empty_when_default!(RequestBodyDiff);

impl<'a> Differ<'a> {
    /// Compare two optional request bodies.
    ///
    /// A missing body is compared as an empty, optional one, so adding a
    /// required body shows up as `required` going from false to true and its
    /// media types as added content.
    pub(crate) fn request_body(
        &self,
        base: Option<&RequestBody>,
        revision: Option<&RequestBody>,
    ) -> Option<RequestBodyDiff> {
        let absent = RequestBody::default();
        let mut diff = self.request_body_fields(
            base.unwrap_or(&absent),
            revision.unwrap_or(&absent),
        );
        diff.body_added = base.is_none() && revision.is_some();
        diff.body_deleted = base.is_some() && revision.is_none();
        non_empty(diff)
    }

    fn request_body_fields(&self, base: &RequestBody, revision: &RequestBody) -> RequestBodyDiff {
        RequestBodyDiff {
            body_added: false,
            body_deleted: false,
            description_diff: self.description(&base.description, &revision.description),
            required_diff: value_diff(&base.required, &revision.required),
            content_diff: self.content(&base.content, &revision.content),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        }
    }
}
