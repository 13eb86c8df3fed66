//! Structural comparison of two OpenAPI documents.
//!
//! The result is a tree of `*Diff` values mirroring the shape of the
//! documents. Every node follows the same convention: an absent child means
//! "no difference", and a node is only attached to its parent when it is
//! non-empty. A document compared with itself therefore yields
//! `Diff::default()`.
//!
//! All comparators are methods on [`Differ`], which carries the run
//! [`Config`], the two component registries used to resolve `$ref`s, and the
//! cycle guard for recursive schemas. A `Differ` lives for exactly one
//! [`compare`] call.

use std::cell::RefCell;
use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

use crate::breaking;
use crate::config::Config;
use crate::openapi::{Component, Components, OpenApi, ReferenceOr, SecurityRequirement};

mod collection;
mod components;
mod content;
mod document;
mod extensions;
mod header;
mod info;
mod operation;
mod parameter;
mod path;
mod request_body;
mod response;
mod schema;
mod security;
mod servers;
mod tags;
mod value;

pub use collection::{reconcile, CollectionDiff};
pub use components::ComponentsDiff;
pub use content::{ContentDiff, EncodingDiff, ExampleDiff, ExamplesDiff, MediaTypeDiff};
pub use document::Diff;
pub use extensions::ExtensionsDiff;
pub use header::{HeaderDiff, HeadersDiff};
pub use info::{ExternalDocsDiff, InfoDiff};
pub use operation::{OperationDiff, OperationsDiff};
pub use parameter::{ParamDiff, ParametersDiff};
pub use path::{PathDiff, PathsDiff};
pub use request_body::RequestBodyDiff;
pub use response::{ResponseDiff, ResponsesDiff};
pub use schema::{Composition, CompositionDiff, SchemaDiff};
pub use security::{ScopesDiff, SecurityDiff, SecuritySchemeDiff};
pub use servers::{ServerDiff, ServersDiff, VariableDiff};
pub use tags::{TagDiff, TagsDiff};
pub use value::{value_diff, ListDiff, ValueDiff};

/// Emptiness predicate shared by every diff node.
pub trait Empty {
    fn is_empty(&self) -> bool;
}

/// Implement [`Empty`] as equality with the type's `Default`.
macro_rules! empty_when_default {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::diff::Empty for $ty {
                fn is_empty(&self) -> bool {
                    *self == <$ty>::default()
                }
            }
        )+
    };
}
pub(crate) use empty_when_default;

/// `Some(diff)` unless the diff is empty.
pub(crate) fn non_empty<D: Empty>(diff: D) -> Option<D> {
    if diff.is_empty() {
        None
    } else {
        Some(diff)
    }
}

/// Compare `base` against `revision`.
///
/// Never fails: unresolved references compare as empty schemas and cyclic
/// schemas are cut off on re-entry. When the config asks for breaking changes
/// only, the returned tree is already pruned to them.
pub fn compare(config: &Config, base: &OpenApi, revision: &OpenApi) -> Diff {
    let differ = Differ::new(config, &base.components, &revision.components)
        .with_security(&base.security, &revision.security);
    let diff = differ.document(base, revision);
    if config.breaking_only {
        breaking::breaking_only(&diff)
    } else {
        diff
    }
}

/// Comparison context for a single [`compare`] call.
pub(crate) struct Differ<'a> {
    config: &'a Config,
    base: &'a Components,
    revision: &'a Components,
    /// Document-wide requirements, inherited by operations without their own.
    base_security: &'a [SecurityRequirement],
    revision_security: &'a [SecurityRequirement],
    /// (base schema, revision schema) address pairs on the active recursion path.
    visited: RefCell<HashSet<(usize, usize)>>,
}

impl<'a> Differ<'a> {
    pub(crate) fn new(config: &'a Config, base: &'a Components, revision: &'a Components) -> Self {
        Self {
            config,
            base,
            revision,
            base_security: &[],
            revision_security: &[],
            visited: RefCell::new(HashSet::new()),
        }
    }

    pub(crate) fn with_security(
        mut self,
        base: &'a [SecurityRequirement],
        revision: &'a [SecurityRequirement],
    ) -> Self {
        self.base_security = base;
        self.revision_security = revision;
        self
    }

    /// Description-like text, skipped entirely when descriptions are excluded.
    fn description(
        &self,
        base: &Option<String>,
        revision: &Option<String>,
    ) -> Option<ValueDiff<Option<String>>> {
        if self.config.exclude_description {
            return None;
        }
        value_diff(base, revision)
    }

    /// Example values, skipped entirely when examples are excluded.
    fn example(
        &self,
        base: &Option<Value>,
        revision: &Option<Value>,
    ) -> Option<ValueDiff<Option<Value>>> {
        if self.config.exclude_examples {
            return None;
        }
        value_diff(base, revision)
    }
}

/// Resolve `item` against `components`, logging references that go nowhere.
pub(crate) fn resolve<'a, T: Component>(
    components: &'a Components,
    item: &'a ReferenceOr<T>,
) -> Option<&'a T> {
    let found = components.resolve(item);
    if found.is_none() {
        tracing::debug!(
            reference = item.reference().unwrap_or_default(),
            "unresolved {} reference",
            T::KIND
        );
    }
    found
}

/// Entries of a keyed map with owned keys, as [`reconcile`] expects them.
pub(crate) fn entries<V>(map: &IndexMap<String, V>) -> impl Iterator<Item = (String, &V)> {
    map.iter().map(|(key, value)| (key.clone(), value))
}

/// Like [`entries`], resolving each value and dropping unresolvable ones.
pub(crate) fn resolved_entries<'a, T: Component>(
    components: &'a Components,
    map: &'a IndexMap<String, ReferenceOr<T>>,
) -> impl Iterator<Item = (String, &'a T)> + 'a {
    map.iter()
        .filter_map(move |(key, item)| resolve(components, item).map(|value| (key.clone(), value)))
}
