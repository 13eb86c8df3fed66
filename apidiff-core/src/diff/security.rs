//! Security requirements and security scheme definitions.

use indexmap::IndexMap;
use serde::Serialize;

use super::{
    non_empty, reconcile, resolved_entries, value_diff, CollectionDiff, Differ, Empty,
    ExtensionsDiff, ListDiff, ValueDiff,
};
use crate::openapi::{OAuthFlows, ReferenceOr, SecurityRequirement, SecurityScheme};

/// Label of the empty requirement `{}`, which makes authentication optional.
const ANONYMOUS: &str = "anonymous";

/// Changes to a list of alternative security requirements.
///
/// A requirement is identified by its scheme names, sorted and joined with
/// ` AND `. Requirements present on both sides report scope changes per
/// scheme.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SecurityDiff {
    /// Whether a caller must authenticate at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub modified: IndexMap<String, ScopesDiff>,
}

/// Scope changes per scheme name within one requirement.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScopesDiff(pub IndexMap<String, ListDiff<String>>);

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SecuritySchemeDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_diff: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows_diff: Option<ValueDiff<Option<OAuthFlows>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

super::empty_when_default!(SecurityDiff, ScopesDiff, SecuritySchemeDiff);

/// Identity of a requirement: its sorted scheme names.
pub(crate) fn requirement_id(requirement: &SecurityRequirement) -> String {
    if requirement.is_empty() {
        return ANONYMOUS.to_string();
    }
    let mut names: Vec<&str> = requirement.keys().map(String::as_str).collect();
    names.sort_unstable();
    names.join(" AND ")
}

/// Authentication is required when there is at least one requirement and
/// none of them is the empty one.
fn is_required(requirements: &[SecurityRequirement]) -> bool {
    !requirements.is_empty() && requirements.iter().all(|requirement| !requirement.is_empty())
}

fn keyed(
    requirements: &[SecurityRequirement],
) -> impl Iterator<Item = (String, &SecurityRequirement)> {
    requirements
        .iter()
        .map(|requirement| (requirement_id(requirement), requirement))
}

fn scopes(base: &SecurityRequirement, revision: &SecurityRequirement) -> Option<ScopesDiff> {
    let mut diff = ScopesDiff::default();
    for (scheme, from) in base {
        let Some(to) = revision.get(scheme) else {
            continue;
        };
        let changed = ListDiff::between(from, to);
        if !changed.is_empty() {
            diff.0.insert(scheme.clone(), changed);
        }
    }
    non_empty(diff)
}

impl<'a> Differ<'a> {
    pub(crate) fn security(
        &self,
        base: &[SecurityRequirement],
        revision: &[SecurityRequirement],
    ) -> Option<SecurityDiff> {
        let requirements = reconcile(keyed(base), keyed(revision), |_, from, to| scopes(from, to));

        non_empty(SecurityDiff {
            required_diff: value_diff(&is_required(base), &is_required(revision)),
            added: requirements.added,
            deleted: requirements.deleted,
            modified: requirements.modified,
        })
    }

    pub(crate) fn security_schemes(
        &self,
        base: &IndexMap<String, ReferenceOr<SecurityScheme>>,
        revision: &IndexMap<String, ReferenceOr<SecurityScheme>>,
    ) -> Option<CollectionDiff<String, SecuritySchemeDiff>> {
        non_empty(reconcile(
            resolved_entries(self.base, base),
            resolved_entries(self.revision, revision),
            |_, from, to| self.security_scheme(from, to),
        ))
    }

    fn security_scheme(
        &self,
        base: &SecurityScheme,
        revision: &SecurityScheme,
    ) -> Option<SecuritySchemeDiff> {
        non_empty(SecuritySchemeDiff {
            type_diff: value_diff(&base.scheme_type, &revision.scheme_type),
            description_diff: self.description(&base.description, &revision.description),
            name_diff: value_diff(&base.name, &revision.name),
            in_diff: value_diff(&base.location, &revision.location),
            scheme_diff: value_diff(&base.scheme, &revision.scheme),
            bearer_format_diff: value_diff(&base.bearer_format, &revision.bearer_format),
            flows_diff: value_diff(&base.flows, &revision.flows),
            open_id_connect_url_diff: value_diff(
                &base.open_id_connect_url,
                &revision.open_id_connect_url,
            ),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        })
    }
}
