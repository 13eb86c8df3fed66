//! Comparison of whole documents, the root of the diff tree.

use serde::Serialize;

use super::{
    value_diff, ComponentsDiff, Differ, ExtensionsDiff, ExternalDocsDiff, InfoDiff,
    PathsDiff, SecurityDiff, ServersDiff, TagsDiff, ValueDiff,
};
use crate::openapi::OpenApi;

/// Root of the diff tree.
///
/// `Diff::default()` means the two documents are equivalent under the
/// configuration used to compare them.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Diff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi_diff: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_diff: Option<InfoDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths_diff: Option<PathsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_diff: Option<SecurityDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers_diff: Option<ServersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags_diff: Option<TagsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs_diff: Option<ExternalDocsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components_diff: Option<ComponentsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

super::empty_when_default!(Diff);

impl<'a> Differ<'a> {
    pub(crate) fn document(&self, base: &OpenApi, revision: &OpenApi) -> Diff {
        let diff = Diff {
            openapi_diff: value_diff(&base.openapi, &revision.openapi),
            info_diff: self.info(&base.info, &revision.info),
            paths_diff: self.paths(&base.paths, &revision.paths),
            security_diff: self.security(&base.security, &revision.security),
            servers_diff: self.servers(&base.servers, &revision.servers),
            tags_diff: self.tags(&base.tags, &revision.tags),
            external_docs_diff: self
                .external_docs(base.external_docs.as_ref(), revision.external_docs.as_ref()),
            components_diff: self.components(&base.components, &revision.components),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        };
        tracing::debug!(
            modified_paths = diff.paths_diff.as_ref().map_or(0, |paths| paths.modified.len()),
            "document comparison finished"
        );
        diff
    }
}
