//! Breaking-change classification.
//!
//! A single walk over a [`Diff`] both lists the breaking changes it contains
//! and builds a pruned copy holding only those changes (plus the parents
//! needed to reach them). Everything the walk does not explicitly flag is
//! non-breaking: descriptions, examples, deprecation, tags, extensions and
//! additions in general.
//!
//! Whether a schema change breaks clients depends on which way data flows.
//! Parameters and request bodies are read by the server, so tightening them
//! is breaking; responses are read by the client, so loosening them is.
//! Component schemas are never classified on their own; their effect shows
//! up wherever they are used.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;

use crate::diff::{
    non_empty, CollectionDiff, ComponentsDiff, Composition, CompositionDiff, ContentDiff, Diff,
    HeaderDiff, HeadersDiff, ListDiff, MediaTypeDiff, OperationDiff, OperationsDiff, ParamDiff,
    ParametersDiff, PathDiff, PathsDiff, RequestBodyDiff, ResponseDiff, ResponsesDiff, SchemaDiff,
    ScopesDiff, SecurityDiff, ServersDiff, ValueDiff,
};

/// Which way data flows through the part of the document being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sent by the client, validated by the server.
    Request,
    /// Sent by the server, consumed by the client.
    Response,
}

/// A single breaking change and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakingChange {
    /// Path through the diff tree, e.g. `paths > /pets > GET > responses > 200`.
    pub location: String,
    pub message: String,
}

impl fmt::Display for BreakingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.location, self.message)
        }
    }
}

/// List the breaking changes in `diff`, in document order.
pub fn classify(diff: &Diff) -> Vec<BreakingChange> {
    let mut walker = Walker::default();
    walker.document(diff);
    walker.changes
}

/// Copy of `diff` keeping only breaking changes and their ancestors.
pub fn breaking_only(diff: &Diff) -> Diff {
    Walker::default().document(diff).unwrap_or_default()
}

pub fn is_breaking(diff: &Diff) -> bool {
    !classify(diff).is_empty()
}

const LOCATION_SEPARATOR: &str = " > ";

#[derive(Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}

/// Render a value for a message.
fn show<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[derive(Default)]
struct Walker {
    location: Vec<String>,
    changes: Vec<BreakingChange>,
}

impl Walker {
    fn report(&mut self, message: impl Into<String>) {
        self.changes.push(BreakingChange {
            location: self.location.join(LOCATION_SEPARATOR),
            message: message.into(),
        });
    }

    fn within<T>(&mut self, segment: impl fmt::Display, visit: impl FnOnce(&mut Self) -> T) -> T {
        self.location.push(segment.to_string());
        let result = visit(self);
        self.location.pop();
        result
    }

    /// Visit an optional child node under `segment`.
    fn child<D>(
        &mut self,
        diff: &Option<D>,
        segment: &str,
        visit: impl FnOnce(&mut Self, &D) -> Option<D>,
    ) -> Option<D> {
        let diff = diff.as_ref()?;
        self.within(segment, |walker| visit(walker, diff))
    }

    /// Report every deleted key as breaking and keep them all.
    fn deleted<K: Clone + fmt::Display>(&mut self, keys: &[K], what: &str) -> Vec<K> {
        for key in keys {
            self.report(format!("{} '{}' deleted", what, key));
        }
        keys.to_vec()
    }

    fn modified<K, D>(
        &mut self,
        modified: &IndexMap<K, D>,
        mut visit: impl FnMut(&mut Self, &D) -> Option<D>,
    ) -> IndexMap<K, D>
    where
        K: Clone + Hash + Eq + fmt::Display,
    {
        let mut kept = IndexMap::new();
        for (key, diff) in modified {
            if let Some(breaking) = self.within(key, |walker| visit(walker, diff)) {
                kept.insert(key.clone(), breaking);
            }
        }
        kept
    }

    fn modified_only<D>(
        &mut self,
        diff: &CollectionDiff<String, D>,
        visit: impl FnMut(&mut Self, &D) -> Option<D>,
    ) -> Option<CollectionDiff<String, D>> {
        non_empty(CollectionDiff {
            added: Vec::new(),
            deleted: Vec::new(),
            modified: self.modified(&diff.modified, visit),
        })
    }

    /// A boolean change is breaking when it ends at `breaking_to`.
    fn flag(
        &mut self,
        diff: &Option<ValueDiff<bool>>,
        breaking_to: bool,
        message: &str,
    ) -> Option<ValueDiff<bool>> {
        let diff = diff.as_ref().filter(|diff| diff.to == breaking_to)?;
        self.report(message);
        Some(diff.clone())
    }

    /// Any change to the value is breaking.
    fn changed<T: Clone + Serialize>(
        &mut self,
        diff: &Option<ValueDiff<T>>,
        what: &str,
    ) -> Option<ValueDiff<T>> {
        let diff = diff.as_ref()?;
        self.report(format!(
            "{} changed from {} to {}",
            what,
            show(&diff.from),
            show(&diff.to)
        ));
        Some(diff.clone())
    }

    /// Numeric bounds: tightening breaks requests, loosening breaks responses.
    /// Introducing a bound tightens it; dropping one loosens it.
    fn bound<T: PartialOrd + Clone + Serialize>(
        &mut self,
        diff: &Option<ValueDiff<Option<T>>>,
        bound: Bound,
        direction: Direction,
        what: &str,
    ) -> Option<ValueDiff<Option<T>>> {
        let diff = diff.as_ref()?;
        let tightened = match (bound, &diff.from, &diff.to) {
            (_, None, Some(_)) => true,
            (_, Some(_), None) | (_, None, None) => false,
            (Bound::Lower, Some(from), Some(to)) => to > from,
            (Bound::Upper, Some(from), Some(to)) => to < from,
        };
        let breaking = match direction {
            Direction::Request => tightened,
            Direction::Response => !tightened,
        };
        if !breaking {
            return None;
        }
        self.report(format!(
            "{} {} from {} to {}",
            what,
            if tightened { "tightened" } else { "loosened" },
            show(&diff.from),
            show(&diff.to)
        ));
        Some(diff.clone())
    }

    fn document(&mut self, diff: &Diff) -> Option<Diff> {
        non_empty(Diff {
            paths_diff: self.child(&diff.paths_diff, "paths", Self::paths),
            security_diff: self.child(&diff.security_diff, "security", Self::security),
            servers_diff: self.child(&diff.servers_diff, "servers", Self::servers),
            components_diff: self.child(&diff.components_diff, "components", Self::components),
            ..Default::default()
        })
    }

    fn paths(&mut self, diff: &PathsDiff) -> Option<PathsDiff> {
        non_empty(CollectionDiff {
            added: Vec::new(),
            deleted: self.deleted(&diff.deleted, "path"),
            modified: self.modified(&diff.modified, Self::path),
        })
    }

    fn path(&mut self, diff: &PathDiff) -> Option<PathDiff> {
        non_empty(PathDiff {
            operations_diff: diff
                .operations_diff
                .as_ref()
                .and_then(|operations| self.operations(operations)),
            parameters_diff: self.child(&diff.parameters_diff, "parameters", Self::parameters),
            servers_diff: self.child(&diff.servers_diff, "servers", Self::servers),
            ..Default::default()
        })
    }

    fn operations(&mut self, diff: &OperationsDiff) -> Option<OperationsDiff> {
        non_empty(CollectionDiff {
            added: Vec::new(),
            deleted: self.deleted(&diff.deleted, "operation"),
            modified: self.modified(&diff.modified, Self::operation),
        })
    }

    fn operation(&mut self, diff: &OperationDiff) -> Option<OperationDiff> {
        non_empty(OperationDiff {
            parameters_diff: self.child(&diff.parameters_diff, "parameters", Self::parameters),
            request_body_diff: self.child(&diff.request_body_diff, "requestBody", Self::request_body),
            responses_diff: self.child(&diff.responses_diff, "responses", Self::responses),
            security_diff: self.child(&diff.security_diff, "security", Self::security),
            servers_diff: self.child(&diff.servers_diff, "servers", Self::servers),
            ..Default::default()
        })
    }

    fn parameters(&mut self, diff: &ParametersDiff) -> Option<ParametersDiff> {
        let mut kept = ParametersDiff::default();
        for (location, names) in &diff.added_required {
            for name in names {
                self.report(format!("new required {} parameter '{}'", location, name));
            }
            kept.added.insert(*location, names.clone());
            kept.added_required.insert(*location, names.clone());
        }
        for (location, params) in &diff.modified {
            for (name, param) in params {
                let segment = format!("{}.{}", location, name);
                if let Some(breaking) = self.within(segment, |walker| walker.param(param)) {
                    kept.modified
                        .entry(*location)
                        .or_default()
                        .insert(name.clone(), breaking);
                }
            }
        }
        non_empty(kept)
    }

    fn param(&mut self, diff: &ParamDiff) -> Option<ParamDiff> {
        non_empty(ParamDiff {
            required_diff: self.flag(&diff.required_diff, true, "parameter became required"),
            style_diff: self.changed(&diff.style_diff, "style"),
            explode_diff: self.changed(&diff.explode_diff, "explode"),
            allow_empty_value_diff: self.flag(
                &diff.allow_empty_value_diff,
                false,
                "empty values are no longer allowed",
            ),
            allow_reserved_diff: self.flag(
                &diff.allow_reserved_diff,
                false,
                "reserved characters are no longer allowed",
            ),
            schema_diff: self.child(&diff.schema_diff, "schema", |walker, schema| {
                walker.schema(schema, Direction::Request)
            }),
            content_diff: self.child(&diff.content_diff, "content", |walker, content| {
                walker.content(content, Direction::Request)
            }),
            ..Default::default()
        })
    }

    fn request_body(&mut self, diff: &RequestBodyDiff) -> Option<RequestBodyDiff> {
        let required_diff = self.flag(&diff.required_diff, true, "request body became required");
        non_empty(RequestBodyDiff {
            body_added: diff.body_added && required_diff.is_some(),
            required_diff,
            content_diff: self.child(&diff.content_diff, "content", |walker, content| {
                walker.content(content, Direction::Request)
            }),
            ..Default::default()
        })
    }

    fn responses(&mut self, diff: &ResponsesDiff) -> Option<ResponsesDiff> {
        non_empty(CollectionDiff {
            added: Vec::new(),
            deleted: self.deleted(&diff.deleted, "response"),
            modified: self.modified(&diff.modified, Self::response),
        })
    }

    fn response(&mut self, diff: &ResponseDiff) -> Option<ResponseDiff> {
        non_empty(ResponseDiff {
            headers_diff: self.child(&diff.headers_diff, "headers", Self::response_headers),
            content_diff: self.child(&diff.content_diff, "content", |walker, content| {
                walker.content(content, Direction::Response)
            }),
            ..Default::default()
        })
    }

    fn response_headers(&mut self, diff: &HeadersDiff) -> Option<HeadersDiff> {
        non_empty(CollectionDiff {
            added: Vec::new(),
            deleted: self.deleted(&diff.deleted, "header"),
            modified: self.modified(&diff.modified, |walker, header| {
                walker.header(header, Direction::Response)
            }),
        })
    }

    fn header(&mut self, diff: &HeaderDiff, direction: Direction) -> Option<HeaderDiff> {
        let required_diff = match direction {
            Direction::Request => self.flag(&diff.required_diff, true, "header became required"),
            Direction::Response => {
                self.flag(&diff.required_diff, false, "header is no longer always sent")
            }
        };
        non_empty(HeaderDiff {
            required_diff,
            schema_diff: self.child(&diff.schema_diff, "schema", |walker, schema| {
                walker.schema(schema, direction)
            }),
            content_diff: self.child(&diff.content_diff, "content", |walker, content| {
                walker.content(content, direction)
            }),
            ..Default::default()
        })
    }

    fn content(&mut self, diff: &ContentDiff, direction: Direction) -> Option<ContentDiff> {
        non_empty(CollectionDiff {
            added: Vec::new(),
            deleted: self.deleted(&diff.deleted, "media type"),
            modified: self.modified(&diff.modified, |walker, media| {
                walker.media_type(media, direction)
            }),
        })
    }

    fn media_type(&mut self, diff: &MediaTypeDiff, direction: Direction) -> Option<MediaTypeDiff> {
        non_empty(MediaTypeDiff {
            schema_diff: self.child(&diff.schema_diff, "schema", |walker, schema| {
                walker.schema(schema, direction)
            }),
            ..Default::default()
        })
    }

    fn schema(&mut self, diff: &SchemaDiff, direction: Direction) -> Option<SchemaDiff> {
        let request = direction == Direction::Request;
        let mut kept = SchemaDiff::default();

        if diff.schema_added && request {
            self.report("schema added");
            kept.schema_added = true;
        }
        if diff.schema_deleted && !request {
            self.report("schema deleted");
            kept.schema_deleted = true;
        }

        kept.type_diff = self.changed(&diff.type_diff, "type");
        kept.format_diff = self.changed(&diff.format_diff, "format");

        if let Some(values) = diff.enum_diff.as_ref().filter(|values| !values.deleted.is_empty()) {
            self.report(format!("enum values removed: {}", show(&values.deleted)));
            kept.enum_diff = Some(ListDiff {
                added: Vec::new(),
                deleted: values.deleted.clone(),
            });
        }

        if let Some(required) = &diff.required_diff {
            if request && !required.added.is_empty() {
                self.report(format!("properties became required: {}", required.added.join(", ")));
                kept.required_diff = Some(ListDiff {
                    added: required.added.clone(),
                    deleted: Vec::new(),
                });
            } else if !request && !required.deleted.is_empty() {
                self.report(format!(
                    "properties are no longer required: {}",
                    required.deleted.join(", ")
                ));
                kept.required_diff = Some(ListDiff {
                    added: Vec::new(),
                    deleted: required.deleted.clone(),
                });
            }
        }

        kept.nullable_diff = match direction {
            Direction::Request => self.flag(&diff.nullable_diff, false, "null is no longer accepted"),
            Direction::Response => self.flag(&diff.nullable_diff, true, "value may now be null"),
        };
        if request {
            kept.additional_properties_allowed_diff = self.flag(
                &diff.additional_properties_allowed_diff,
                false,
                "additional properties are no longer accepted",
            );
        }

        kept.minimum_diff = self.bound(&diff.minimum_diff, Bound::Lower, direction, "minimum");
        kept.maximum_diff = self.bound(&diff.maximum_diff, Bound::Upper, direction, "maximum");
        kept.min_length_diff = self.bound(&diff.min_length_diff, Bound::Lower, direction, "minLength");
        kept.max_length_diff = self.bound(&diff.max_length_diff, Bound::Upper, direction, "maxLength");
        kept.min_items_diff = self.bound(&diff.min_items_diff, Bound::Lower, direction, "minItems");
        kept.max_items_diff = self.bound(&diff.max_items_diff, Bound::Upper, direction, "maxItems");
        kept.min_properties_diff =
            self.bound(&diff.min_properties_diff, Bound::Lower, direction, "minProperties");
        kept.max_properties_diff =
            self.bound(&diff.max_properties_diff, Bound::Upper, direction, "maxProperties");
        // Becoming exclusive tightens a bound.
        kept.exclusive_minimum_diff =
            self.flag(&diff.exclusive_minimum_diff, request, "exclusiveMinimum changed");
        kept.exclusive_maximum_diff =
            self.flag(&diff.exclusive_maximum_diff, request, "exclusiveMaximum changed");

        // A pattern or multipleOf on the side that validates constrains values.
        if let Some(pattern) = &diff.pattern_diff {
            if (request && pattern.to.is_some()) || (!request && pattern.from.is_some()) {
                kept.pattern_diff = self.changed(&diff.pattern_diff, "pattern");
            }
        }
        if let Some(multiple_of) = &diff.multiple_of_diff {
            if (request && multiple_of.to.is_some()) || (!request && multiple_of.from.is_some()) {
                kept.multiple_of_diff = self.changed(&diff.multiple_of_diff, "multipleOf");
            }
        }

        kept.properties_diff = self.child(&diff.properties_diff, "properties", |walker, properties| {
            walker.properties(properties, direction)
        });
        kept.additional_properties_diff = self.child(
            &diff.additional_properties_diff,
            "additionalProperties",
            |walker, schema| walker.schema(schema, direction).map(Box::new),
        );
        kept.items_diff = self.child(&diff.items_diff, "items", |walker, schema| {
            walker.schema(schema, direction).map(Box::new)
        });
        kept.all_of_diff = self.child(&diff.all_of_diff, "allOf", |walker, branches| {
            walker.composition(branches, Composition::AllOf, direction)
        });
        kept.any_of_diff = self.child(&diff.any_of_diff, "anyOf", |walker, branches| {
            walker.composition(branches, Composition::AnyOf, direction)
        });
        kept.one_of_diff = self.child(&diff.one_of_diff, "oneOf", |walker, branches| {
            walker.composition(branches, Composition::OneOf, direction)
        });

        non_empty(kept)
    }

    fn properties(
        &mut self,
        diff: &CollectionDiff<String, SchemaDiff>,
        direction: Direction,
    ) -> Option<CollectionDiff<String, SchemaDiff>> {
        let deleted = match direction {
            Direction::Request => Vec::new(),
            Direction::Response => self.deleted(&diff.deleted, "property"),
        };
        non_empty(CollectionDiff {
            added: Vec::new(),
            deleted,
            modified: self.modified(&diff.modified, |walker, schema| {
                walker.schema(schema, direction)
            }),
        })
    }

    /// `oneOf`/`anyOf` offer alternatives: fewer breaks requests, more
    /// breaks responses. `allOf` stacks constraints, so it is the reverse.
    fn composition(
        &mut self,
        diff: &CompositionDiff,
        keyword: Composition,
        direction: Direction,
    ) -> Option<CompositionDiff> {
        let breaking = match (keyword, direction) {
            (Composition::OneOf | Composition::AnyOf, Direction::Request)
            | (Composition::AllOf, Direction::Response) => diff.narrowed(),
            (Composition::OneOf | Composition::AnyOf, Direction::Response)
            | (Composition::AllOf, Direction::Request) => diff.widened(),
        };

        let mut kept = CompositionDiff::default();
        if let Some(count) = diff.count_diff.as_ref().filter(|_| breaking) {
            self.report(format!(
                "{} branches changed from {} to {}",
                keyword.as_str(),
                count.from,
                count.to
            ));
            kept.count_diff = Some(count.clone());
            kept.added = diff.added.clone();
            kept.deleted = diff.deleted.clone();
        }
        kept.modified = self.modified(&diff.modified, |walker, schema| {
            walker.schema(schema, direction)
        });
        non_empty(kept)
    }

    fn security(&mut self, diff: &SecurityDiff) -> Option<SecurityDiff> {
        let required_diff = self.flag(&diff.required_diff, true, "authentication became required");
        // Dropping every requirement opens the endpoint up; that is not breaking.
        let opened = diff.required_diff.as_ref().is_some_and(|required| !required.to);
        let deleted = if opened {
            Vec::new()
        } else {
            self.deleted(&diff.deleted, "security requirement")
        };
        non_empty(SecurityDiff {
            required_diff,
            added: Vec::new(),
            deleted,
            modified: self.modified(&diff.modified, Self::scopes),
        })
    }

    fn scopes(&mut self, diff: &ScopesDiff) -> Option<ScopesDiff> {
        let mut kept = ScopesDiff::default();
        for (scheme, scopes) in &diff.0 {
            if scopes.added.is_empty() {
                continue;
            }
            self.report(format!(
                "scopes required for '{}': {}",
                scheme,
                scopes.added.join(", ")
            ));
            kept.0.insert(
                scheme.clone(),
                ListDiff {
                    added: scopes.added.clone(),
                    deleted: Vec::new(),
                },
            );
        }
        non_empty(kept)
    }

    fn servers(&mut self, diff: &ServersDiff) -> Option<ServersDiff> {
        non_empty(CollectionDiff {
            added: Vec::new(),
            deleted: self.deleted(&diff.deleted, "server"),
            modified: IndexMap::new(),
        })
    }

    fn components(&mut self, diff: &ComponentsDiff) -> Option<ComponentsDiff> {
        non_empty(ComponentsDiff {
            parameters_diff: self.child(&diff.parameters_diff, "parameters", |walker, params| {
                walker.modified_only(params, Self::param)
            }),
            headers_diff: self.child(&diff.headers_diff, "headers", |walker, headers| {
                walker.modified_only(headers, |walker, header| {
                    walker.header(header, Direction::Response)
                })
            }),
            request_bodies_diff: self.child(
                &diff.request_bodies_diff,
                "requestBodies",
                |walker, bodies| walker.modified_only(bodies, Self::request_body),
            ),
            responses_diff: self.child(&diff.responses_diff, "responses", |walker, responses| {
                walker.modified_only(responses, Self::response)
            }),
            ..Default::default()
        })
    }
}
