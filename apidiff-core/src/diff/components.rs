//! Reusable components, one keyed collection per component kind.

use serde::Serialize;

use super::{
    non_empty, reconcile, resolved_entries, CollectionDiff, Differ, HeadersDiff, ParamDiff,
    RequestBodyDiff, ResponsesDiff, SchemaDiff, SecuritySchemeDiff,
};
use crate::openapi::Components;

/// Reusable component registries, each keyed by component name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ComponentsDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas_diff: Option<CollectionDiff<String, SchemaDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_diff: Option<CollectionDiff<String, ParamDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers_diff: Option<HeadersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_bodies_diff: Option<CollectionDiff<String, RequestBodyDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses_diff: Option<ResponsesDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_schemes_diff: Option<CollectionDiff<String, SecuritySchemeDiff>>,
}

super::empty_when_default!(ComponentsDiff);

impl<'a> Differ<'a> {
    pub(crate) fn components(
        &self,
        base: &Components,
        revision: &Components,
    ) -> Option<ComponentsDiff> {
        non_empty(ComponentsDiff {
            schemas_diff: non_empty(reconcile(
                base.schemas.iter().map(|(name, schema)| (name.clone(), schema)),
                revision.schemas.iter().map(|(name, schema)| (name.clone(), schema)),
                |_, from, to| self.schema_refs(Some(from), Some(to)),
            )),
            parameters_diff: non_empty(reconcile(
                resolved_entries(self.base, &base.parameters),
                resolved_entries(self.revision, &revision.parameters),
                |_, from, to| self.parameter(from, to),
            )),
            headers_diff: self.headers(&base.headers, &revision.headers),
            request_bodies_diff: non_empty(reconcile(
                resolved_entries(self.base, &base.request_bodies),
                resolved_entries(self.revision, &revision.request_bodies),
                |_, from, to| self.request_body(Some(from), Some(to)),
            )),
            responses_diff: self.responses(&base.responses, &revision.responses),
            security_schemes_diff: self
                .security_schemes(&base.security_schemes, &revision.security_schemes),
        })
    }
}
