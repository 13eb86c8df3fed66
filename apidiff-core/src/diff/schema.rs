//! Recursive schema comparison.
//!
//! Schemas are compared attribute by attribute, recursing into properties,
//! array items, `additionalProperties`, `not` and the three composition
//! keywords. References are resolved against each side's own components, so
//! a schema graph can be cyclic. The [`Differ`] keeps the pairs of schemas
//! currently being compared; re-entering a pair that is already on the
//! recursion path contributes no further difference.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use super::{
    entries, non_empty, reconcile, resolve, value_diff, CollectionDiff, Differ, ExtensionsDiff,
    ListDiff, ValueDiff,
};
use crate::openapi::{Discriminator, Schema, SchemaRef};

/// Stand-in for references that do not resolve. Accepts anything.
static ANY_SCHEMA: Lazy<Schema> = Lazy::new(Schema::default);

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SchemaDiff {
    /// Only the revision declares a schema here.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub schema_added: bool,
    /// Only the base declares a schema here.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub schema_deleted: bool,

    /// Set only when both sides declare a type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_diff: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated_diff: Option<ValueDiff<bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_diff: Option<ValueDiff<Option<Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_diff: Option<ValueDiff<Option<Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_diff: Option<ListDiff<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of_diff: Option<ValueDiff<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_diff: Option<ValueDiff<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_diff: Option<ValueDiff<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length_diff: Option<ValueDiff<Option<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length_diff: Option<ValueDiff<Option<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items_diff: Option<ValueDiff<Option<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items_diff: Option<ValueDiff<Option<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties_diff: Option<ValueDiff<Option<u64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties_diff: Option<ValueDiff<Option<u64>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_diff: Option<ListDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties_diff: Option<CollectionDiff<String, SchemaDiff>>,
    /// Whether undeclared properties are accepted at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties_allowed_diff: Option<ValueDiff<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties_diff: Option<Box<SchemaDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_diff: Option<Box<SchemaDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_diff: Option<Box<SchemaDiff>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of_diff: Option<CompositionDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of_diff: Option<CompositionDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of_diff: Option<CompositionDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_diff: Option<ValueDiff<Option<Discriminator>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

/// The three schema composition keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Composition {
    AllOf,
    AnyOf,
    OneOf,
}

impl Composition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Composition::AllOf => "allOf",
            Composition::AnyOf => "anyOf",
            Composition::OneOf => "oneOf",
        }
    }

    pub fn branches<'s>(&self, schema: &'s Schema) -> &'s [SchemaRef] {
        match self {
            Composition::AllOf => &schema.all_of,
            Composition::AnyOf => &schema.any_of,
            Composition::OneOf => &schema.one_of,
        }
    }
}

/// Changes to the branch list of one composition keyword.
///
/// Branches are matched by position when both sides have the same number of
/// them, and `modified` holds the per-position diffs keyed by the base
/// branch's label. When the counts differ no matching is attempted: every
/// base branch is reported deleted and every revision branch added.
///
/// A branch is labelled by its `$ref`, or by `#<index>` when inline.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CompositionDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_diff: Option<ValueDiff<usize>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub modified: IndexMap<String, SchemaDiff>,
}

impl CompositionDiff {
    /// The revision has fewer branches than the base.
    pub fn narrowed(&self) -> bool {
        self.count_diff.as_ref().is_some_and(|count| count.to < count.from)
    }

    /// The revision has more branches than the base.
    pub fn widened(&self) -> bool {
        self.count_diff.as_ref().is_some_and(|count| count.to > count.from)
    }
}

super::empty_when_default!(SchemaDiff, CompositionDiff);

fn branch_label(index: usize, branch: &SchemaRef) -> String {
    match branch.reference() {
        Some(reference) => reference.to_string(),
        None => format!("#{}", index),
    }
}

impl<'a> Differ<'a> {
    /// Compare two optional schema slots.
    ///
    /// A schema present on one side only is reported through the
    /// `schema_added` / `schema_deleted` flags.
    pub(crate) fn schema_refs(
        &self,
        base: Option<&SchemaRef>,
        revision: Option<&SchemaRef>,
    ) -> Option<SchemaDiff> {
        match (base, revision) {
            (None, None) => None,
            (None, Some(_)) => Some(SchemaDiff {
                schema_added: true,
                ..Default::default()
            }),
            (Some(_), None) => Some(SchemaDiff {
                schema_deleted: true,
                ..Default::default()
            }),
            (Some(base), Some(revision)) => {
                let base = resolve(self.base, base).unwrap_or(&*ANY_SCHEMA);
                let revision = resolve(self.revision, revision).unwrap_or(&*ANY_SCHEMA);
                non_empty(self.schema(base, revision))
            }
        }
    }

    /// Compare two resolved schemas, guarding against cycles.
    pub(crate) fn schema(&self, base: &Schema, revision: &Schema) -> SchemaDiff {
        let pair = (base as *const Schema as usize, revision as *const Schema as usize);
        if !self.visited.borrow_mut().insert(pair) {
            tracing::debug!("schema cycle: pair already under comparison, skipping");
            return SchemaDiff::default();
        }
        let diff = self.schema_fields(base, revision);
        self.visited.borrow_mut().remove(&pair);
        diff
    }

    fn schema_fields(&self, base: &Schema, revision: &Schema) -> SchemaDiff {
        let type_diff = match (&base.schema_type, &revision.schema_type) {
            (Some(from), Some(to)) => value_diff(from, to),
            _ => None,
        };

        SchemaDiff {
            schema_added: false,
            schema_deleted: false,
            type_diff,
            format_diff: value_diff(&base.format, &revision.format),
            title_diff: value_diff(&base.title, &revision.title),
            description_diff: self.description(&base.description, &revision.description),
            nullable_diff: value_diff(&base.nullable, &revision.nullable),
            read_only_diff: value_diff(&base.read_only, &revision.read_only),
            write_only_diff: value_diff(&base.write_only, &revision.write_only),
            deprecated_diff: value_diff(&base.deprecated, &revision.deprecated),
            default_diff: value_diff(&base.default, &revision.default),
            example_diff: self.example(&base.example, &revision.example),
            enum_diff: non_empty(ListDiff::between(&base.enumeration, &revision.enumeration)),
            multiple_of_diff: value_diff(&base.multiple_of, &revision.multiple_of),
            minimum_diff: value_diff(&base.minimum, &revision.minimum),
            maximum_diff: value_diff(&base.maximum, &revision.maximum),
            exclusive_minimum_diff: value_diff(&base.exclusive_minimum, &revision.exclusive_minimum),
            exclusive_maximum_diff: value_diff(&base.exclusive_maximum, &revision.exclusive_maximum),
            min_length_diff: value_diff(&base.min_length, &revision.min_length),
            max_length_diff: value_diff(&base.max_length, &revision.max_length),
            pattern_diff: value_diff(&base.pattern, &revision.pattern),
            min_items_diff: value_diff(&base.min_items, &revision.min_items),
            max_items_diff: value_diff(&base.max_items, &revision.max_items),
            unique_items_diff: value_diff(&base.unique_items, &revision.unique_items),
            min_properties_diff: value_diff(&base.min_properties, &revision.min_properties),
            max_properties_diff: value_diff(&base.max_properties, &revision.max_properties),
            required_diff: non_empty(ListDiff::between(&base.required, &revision.required)),
            properties_diff: non_empty(reconcile(
                entries(&base.properties),
                entries(&revision.properties),
                |_, from, to| self.schema_refs(Some(from), Some(to)),
            )),
            additional_properties_allowed_diff: value_diff(
                &base.additional_properties.as_ref().map_or(true, |extra| extra.allowed()),
                &revision.additional_properties.as_ref().map_or(true, |extra| extra.allowed()),
            ),
            additional_properties_diff: self
                .schema_refs(
                    base.additional_properties.as_ref().and_then(|extra| extra.schema()),
                    revision.additional_properties.as_ref().and_then(|extra| extra.schema()),
                )
                .map(Box::new),
            items_diff: self
                .schema_refs(base.items.as_deref(), revision.items.as_deref())
                .map(Box::new),
            not_diff: self
                .schema_refs(base.not.as_deref(), revision.not.as_deref())
                .map(Box::new),
            all_of_diff: self.composition(Composition::AllOf, base, revision),
            any_of_diff: self.composition(Composition::AnyOf, base, revision),
            one_of_diff: self.composition(Composition::OneOf, base, revision),
            discriminator_diff: value_diff(&base.discriminator, &revision.discriminator),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        }
    }

    fn composition(
        &self,
        keyword: Composition,
        base: &Schema,
        revision: &Schema,
    ) -> Option<CompositionDiff> {
        let base = keyword.branches(base);
        let revision = keyword.branches(revision);

        if base.len() != revision.len() {
            return Some(CompositionDiff {
                count_diff: ValueDiff::new(base.len(), revision.len()),
                added: revision.iter().enumerate().map(|(i, b)| branch_label(i, b)).collect(),
                deleted: base.iter().enumerate().map(|(i, b)| branch_label(i, b)).collect(),
                modified: IndexMap::new(),
            });
        }

        let mut diff = CompositionDiff::default();
        for (index, (from, to)) in base.iter().zip(revision).enumerate() {
            if let Some(changed) = self.schema_refs(Some(from), Some(to)) {
                diff.modified.insert(branch_label(index, from), changed);
            }
        }
        non_empty(diff)
    }
}
