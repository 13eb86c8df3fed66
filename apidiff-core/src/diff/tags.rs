use serde::Serialize;

use super::{non_empty, reconcile, CollectionDiff, Differ, ExtensionsDiff, ExternalDocsDiff, ValueDiff};
use crate::openapi::Tag;

/// Document-level tags keyed by name.
pub type TagsDiff = CollectionDiff<String, TagDiff>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TagDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs_diff: Option<ExternalDocsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

super::empty_when_default!(TagDiff);

impl<'a> Differ<'a> {
    pub(crate) fn tags(&self, base: &[Tag], revision: &[Tag]) -> Option<TagsDiff> {
        non_empty(reconcile(
            base.iter().map(|tag| (tag.name.clone(), tag)),
            revision.iter().map(|tag| (tag.name.clone(), tag)),
            |_, from, to| {
                non_empty(TagDiff {
                    description_diff: self.description(&from.description, &to.description),
                    external_docs_diff: self
                        .external_docs(from.external_docs.as_ref(), to.external_docs.as_ref()),
                    extensions_diff: self.extensions(&from.extensions, &to.extensions),
                })
            },
        ))
    }
}
