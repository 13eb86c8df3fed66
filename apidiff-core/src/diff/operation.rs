//! A single operation under a path.
//!
//! An operation that leaves `security` unset is compared using the
//! document-level requirements; `security: []` marks it public.

use serde::Serialize;

use super::{
    non_empty, resolve, value_diff, CollectionDiff, Differ, ExtensionsDiff, ExternalDocsDiff,
    ListDiff, ParametersDiff, RequestBodyDiff, ResponsesDiff, SecurityDiff, ServersDiff, ValueDiff,
};
use crate::openapi::Operation;

/// Operations keyed by upper-case HTTP method.
pub type OperationsDiff = CollectionDiff<String, OperationDiff>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OperationDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags_diff: Option<ListDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs_diff: Option<ExternalDocsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_diff: Option<ParametersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body_diff: Option<RequestBodyDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses_diff: Option<ResponsesDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_diff: Option<SecurityDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers_diff: Option<ServersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

super::empty_when_default!(OperationDiff);

impl<'a> Differ<'a> {
    pub(crate) fn operation(&self, base: &Operation, revision: &Operation) -> Option<OperationDiff> {
        let base_body = base.request_body.as_ref().and_then(|body| resolve(self.base, body));
        let revision_body = revision
            .request_body
            .as_ref()
            .and_then(|body| resolve(self.revision, body));

        // Unset security inherits the document requirements; `security: []` does not.
        let base_security = base.security.as_deref().unwrap_or(self.base_security);
        let revision_security = revision.security.as_deref().unwrap_or(self.revision_security);

        non_empty(OperationDiff {
            tags_diff: non_empty(ListDiff::between(&base.tags, &revision.tags)),
            summary_diff: self.description(&base.summary, &revision.summary),
            description_diff: self.description(&base.description, &revision.description),
            external_docs_diff: self
                .external_docs(base.external_docs.as_ref(), revision.external_docs.as_ref()),
            operation_id_diff: value_diff(&base.operation_id, &revision.operation_id),
            deprecated_diff: value_diff(&base.deprecated, &revision.deprecated),
            parameters_diff: self.parameters(&base.parameters, &revision.parameters),
            request_body_diff: self.request_body(base_body, revision_body),
            responses_diff: self.responses(&base.responses, &revision.responses),
            security_diff: self.security(base_security, revision_security),
            servers_diff: self.servers(&base.servers, &revision.servers),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        })
    }
}
