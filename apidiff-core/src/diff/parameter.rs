//! Parameter comparison.
//!
//! Parameters are identified by their location and name. Omitted
//! serialization settings are resolved to their documented defaults before
//! comparing, so `explode` left unset and `explode: false` are the same thing,
//! as are an omitted `style` and the location's default style.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::{
    non_empty, reconcile, resolve, value_diff, ContentDiff, Differ, Empty, ExamplesDiff,
    ExtensionsDiff, SchemaDiff, ValueDiff,
};
use crate::openapi::{Parameter, ParameterLocation, ReferenceOr};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParamDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_diff: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_empty_value_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_reserved_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_diff: Option<ValueDiff<bool>>,
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

/// Parameter list changes, grouped by location and then by name.
///
/// `added_required` repeats the entries of `added` that are required, which
/// is what makes an added parameter a breaking change.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParametersDiff {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub added: IndexMap<ParameterLocation, Vec<String>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub added_required: IndexMap<ParameterLocation, Vec<String>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub deleted: IndexMap<ParameterLocation, Vec<String>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub modified: IndexMap<ParameterLocation, IndexMap<String, ParamDiff>>,
}

super::empty_when_default!(ParamDiff, ParametersDiff);

impl ParametersDiff {
    /// Number of (added, deleted, modified) parameters across all locations.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.added.values().map(Vec::len).sum(),
            self.deleted.values().map(Vec::len).sum(),
            self.modified.values().map(IndexMap::len).sum(),
        )
    }
}

type ParamKey = (ParameterLocation, String);

fn keyed<'p>(
    params: impl IntoIterator<Item = &'p Parameter>,
) -> impl Iterator<Item = (ParamKey, &'p Parameter)> {
    params
        .into_iter()
        .map(|param| ((param.location, param.name.clone()), param))
}

impl<'a> Differ<'a> {
    /// Compare two parameter lists, resolving references on each side.
    pub(crate) fn parameters(
        &self,
        base: &[ReferenceOr<Parameter>],
        revision: &[ReferenceOr<Parameter>],
    ) -> Option<ParametersDiff> {
        let base_params = base.iter().filter_map(|item| resolve(self.base, item));
        let revision_params: Vec<&Parameter> = revision
            .iter()
            .filter_map(|item| resolve(self.revision, item))
            .collect();

        let changes = reconcile(
            keyed(base_params),
            keyed(revision_params.iter().copied()),
            |_, from, to| self.parameter(from, to),
        );

        let mut diff = ParametersDiff::default();
        for (location, name) in changes.added {
            let required = revision_params
                .iter()
                .any(|param| param.location == location && param.name == name && param.required);
            if required {
                diff.added_required.entry(location).or_default().push(name.clone());
            }
            diff.added.entry(location).or_default().push(name);
        }
        for (location, name) in changes.deleted {
            diff.deleted.entry(location).or_default().push(name);
        }
        for ((location, name), changed) in changes.modified {
            diff.modified.entry(location).or_default().insert(name, changed);
        }
        non_empty(diff)
    }

    pub(crate) fn parameter(&self, base: &Parameter, revision: &Parameter) -> Option<ParamDiff> {
        let style = |param: &Parameter| {
            param
                .style
                .clone()
                .unwrap_or_else(|| param.location.default_style().to_string())
        };

        let diff = ParamDiff {
            description_diff: self.description(&base.description, &revision.description),
            style_diff: value_diff(&style(base), &style(revision)),
            explode_diff: value_diff(
                &base.explode.unwrap_or(false),
                &revision.explode.unwrap_or(false),
            ),
            allow_empty_value_diff: value_diff(&base.allow_empty_value, &revision.allow_empty_value),
            allow_reserved_diff: value_diff(&base.allow_reserved, &revision.allow_reserved),
            deprecated_diff: value_diff(&base.deprecated, &revision.deprecated),
            required_diff: value_diff(&base.required, &revision.required),
            schema_diff: self.schema_refs(base.schema.as_ref(), revision.schema.as_ref()),
            content_diff: self.content(&base.content, &revision.content),
            example_diff: self.example(&base.example, &revision.example),
            examples_diff: self.examples(&base.examples, &revision.examples),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        };
        if diff.is_empty() {
            None
        } else {
            Some(diff)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::openapi::Components;
    use serde_json::json;

    fn params(value: serde_json::Value) -> Vec<ReferenceOr<Parameter>> {
        serde_json::from_value(value).unwrap()
    }

    fn param(value: serde_json::Value) -> Parameter {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_explode_unset_equals_false() {
        let config = Config::default();
        let components = Components::default();
        let differ = Differ::new(&config, &components, &components);

        let diff = differ.parameter(
            &param(json!({"name": "ids", "in": "query"})),
            &param(json!({"name": "ids", "in": "query", "explode": false})),
        );
        assert!(diff.is_none());

        let diff = differ
            .parameter(
                &param(json!({"name": "ids", "in": "query"})),
                &param(json!({"name": "ids", "in": "query", "explode": true})),
            )
            .unwrap();
        assert_eq!(diff.explode_diff, Some(ValueDiff { from: false, to: true }));
    }

    #[test]
    fn test_style_defaults_by_location() {
        let config = Config::default();
        let components = Components::default();
        let differ = Differ::new(&config, &components, &components);

        assert!(differ
            .parameter(
                &param(json!({"name": "id", "in": "path", "required": true})),
                &param(json!({"name": "id", "in": "path", "required": true, "style": "simple"})),
            )
            .is_none());

        let diff = differ
            .parameter(
                &param(json!({"name": "q", "in": "query"})),
                &param(json!({"name": "q", "in": "query", "style": "spaceDelimited"})),
            )
            .unwrap();
        assert_eq!(diff.style_diff.unwrap().from, "form");
    }

    #[test]
    fn test_parameters_grouped_by_location() {
        let config = Config::default();
        let components = Components::default();
        let differ = Differ::new(&config, &components, &components);

        let diff = differ
            .parameters(
                &params(json!([
                    {"name": "id", "in": "path", "required": true},
                    {"name": "id", "in": "query"},
                    {"name": "verbose", "in": "query"}
                ])),
                &params(json!([
                    {"name": "id", "in": "path", "required": true},
                    {"name": "id", "in": "query", "required": true},
                    {"name": "X-Tenant", "in": "header", "required": true},
                    {"name": "page", "in": "query"}
                ])),
            )
            .unwrap();

        assert_eq!(diff.added[&ParameterLocation::Header], vec!["X-Tenant"]);
        assert_eq!(diff.added[&ParameterLocation::Query], vec!["page"]);
        assert_eq!(diff.added_required[&ParameterLocation::Header], vec!["X-Tenant"]);
        assert!(!diff.added_required.contains_key(&ParameterLocation::Query));
        assert_eq!(diff.deleted[&ParameterLocation::Query], vec!["verbose"]);
        assert!(diff.modified[&ParameterLocation::Query]["id"].required_diff.is_some());
        assert!(!diff.modified.contains_key(&ParameterLocation::Path));
        assert_eq!(diff.counts(), (2, 1, 1));
    }

    #[test]
    fn test_parameter_references_resolved() {
        let config = Config::default();
        let mut components = Components::default();
        components.parameters.insert(
            "Limit".to_string(),
            ReferenceOr::Item(param(json!({"name": "limit", "in": "query"}))),
        );
        let differ = Differ::new(&config, &components, &components);

        let diff = differ.parameters(
            &params(json!([{"$ref": "#/components/parameters/Limit"}])),
            &params(json!([{"name": "limit", "in": "query"}])),
        );
        assert!(diff.is_none());
    }

    #[test]
    fn test_description_excluded() {
        let config = Config::default().excluding_descriptions();
        let components = Components::default();
        let differ = Differ::new(&config, &components, &components);

        let diff = differ.parameter(
            &param(json!({"name": "q", "in": "query", "description": "old"})),
            &param(json!({"name": "q", "in": "query", "description": "new"})),
        );
        assert!(diff.is_none());
    }
}
