//! In-memory model of an OpenAPI 3.0 document.
//!
//! These types are what a loader produces and what the diff engine consumes.
//! They deserialize directly from JSON or YAML via serde. Keyed collections are
//! insertion-ordered so that reports follow the order the author declared.
//!
//! Internal references (`#/components/<kind>/<name>`) are kept as written and
//! resolved lazily through [`Components::resolve`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod de;
mod paths;
mod schema;

pub use de::Extensions;
pub use paths::{
    Encoding, Example, Header, MediaType, OAuthFlow, OAuthFlows, Operation, Parameter,
    ParameterLocation, PathItem, RequestBody, Response, SecurityRequirement, SecurityScheme,
    METHODS,
};
pub use schema::{AdditionalProperties, Discriminator, Schema, SchemaRef};

/// Root of an OpenAPI document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApi {
    #[serde(default)]
    pub openapi: String,
    #[serde(default)]
    pub info: Info,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(default, deserialize_with = "de::string_keyed_map")]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(default)]
    pub version: String,
    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A server the API is reachable at. Servers are identified by URL.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enumeration: Vec<String>,
    #[serde(default)]
    pub default: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
}

/// Either a `$ref` pointer or an inline value.
///
/// The reference variant is listed first so that an object carrying `$ref`
/// is never mistaken for an inline value with every field defaulted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceOr<T> {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Item(T),
}

impl<T> ReferenceOr<T> {
    /// Build a reference to a named component of kind `T`.
    pub fn component(name: &str) -> Self
    where
        T: Component,
    {
        ReferenceOr::Reference {
            reference: format!("#/components/{}/{}", T::KIND, name),
        }
    }

    /// The `$ref` string, if this is a reference.
    pub fn reference(&self) -> Option<&str> {
        match self {
            ReferenceOr::Reference { reference } => Some(reference),
            ReferenceOr::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            ReferenceOr::Reference { .. } => None,
            ReferenceOr::Item(item) => Some(item),
        }
    }
}

/// Reusable objects addressable by `#/components/<kind>/<name>`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaRef>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ReferenceOr<Response>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ReferenceOr<Parameter>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, ReferenceOr<Example>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub request_bodies: IndexMap<String, ReferenceOr<RequestBody>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, ReferenceOr<Header>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub security_schemes: IndexMap<String, ReferenceOr<SecurityScheme>>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A kind of object that lives in one of the [`Components`] registries.
pub trait Component: Sized {
    /// Registry name as it appears in a `$ref`, e.g. `schemas`.
    const KIND: &'static str;

    fn registry(components: &Components) -> &IndexMap<String, ReferenceOr<Self>>;
}

macro_rules! component {
    ($ty:ty, $kind:literal, $field:ident) => {
        impl Component for $ty {
            const KIND: &'static str = $kind;

            fn registry(components: &Components) -> &IndexMap<String, ReferenceOr<Self>> {
                &components.$field
            }
        }
    };
}

component!(Schema, "schemas", schemas);
component!(Response, "responses", responses);
component!(Parameter, "parameters", parameters);
component!(Example, "examples", examples);
component!(RequestBody, "requestBodies", request_bodies);
component!(Header, "headers", headers);
component!(SecurityScheme, "securitySchemes", security_schemes);

/// Upper bound on `$ref` hops followed before a chain is declared circular.
const MAX_REF_HOPS: usize = 64;

impl Components {
    /// Follow `item` through any chain of references to the inline value.
    ///
    /// Returns `None` when a reference points outside this document's
    /// components, names a missing entry, or loops back on itself.
    pub fn resolve<'a, T: Component>(&'a self, item: &'a ReferenceOr<T>) -> Option<&'a T> {
        let mut current = item;
        for _ in 0..MAX_REF_HOPS {
            match current {
                ReferenceOr::Item(value) => return Some(value),
                ReferenceOr::Reference { reference } => {
                    let name = component_name(reference, T::KIND)?;
                    current = T::registry(self).get(name.as_str())?;
                }
            }
        }
        tracing::debug!(kind = T::KIND, "reference chain exceeded {} hops", MAX_REF_HOPS);
        None
    }
}

/// Extract the component name from `#/components/<kind>/<name>`, undoing
/// JSON-pointer escaping.
fn component_name(reference: &str, kind: &str) -> Option<String> {
    let rest = reference.strip_prefix("#/components/")?;
    let (ref_kind, name) = rest.split_once('/')?;
    if ref_kind != kind || name.is_empty() {
        return None;
    }
    Some(name.replace("~1", "/").replace("~0", "~"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_name() {
        assert_eq!(
            component_name("#/components/schemas/Pet", "schemas"),
            Some("Pet".to_string())
        );
        assert_eq!(
            component_name("#/components/schemas/a~1b~0c", "schemas"),
            Some("a/b~c".to_string())
        );
        assert_eq!(component_name("#/components/headers/Pet", "schemas"), None);
        assert_eq!(component_name("other.yaml#/Pet", "schemas"), None);
    }

    #[test]
    fn test_resolve_follows_chain() {
        let mut components = Components::default();
        components
            .schemas
            .insert("Alias".to_string(), SchemaRef::component("Pet"));
        components.schemas.insert(
            "Pet".to_string(),
            ReferenceOr::Item(Schema {
                schema_type: Some("object".to_string()),
                ..Default::default()
            }),
        );

        let alias = SchemaRef::component("Alias");
        let resolved = components.resolve(&alias).unwrap();
        assert_eq!(resolved.schema_type.as_deref(), Some("object"));
    }

    #[test]
    fn test_resolve_circular_alias_is_none() {
        let mut components = Components::default();
        components
            .schemas
            .insert("A".to_string(), SchemaRef::component("B"));
        components
            .schemas
            .insert("B".to_string(), SchemaRef::component("A"));

        assert!(components.resolve(&SchemaRef::component("A")).is_none());
    }

    #[test]
    fn test_reference_variant_wins_over_item() {
        let value: SchemaRef =
            serde_json::from_value(json!({"$ref": "#/components/schemas/Pet"})).unwrap();
        assert_eq!(value.reference(), Some("#/components/schemas/Pet"));
    }

    #[test]
    fn test_deserialize_document() {
        let doc: OpenApi = serde_json::from_value(json!({
            "openapi": "3.0.3",
            "info": {"title": "Pets", "version": "1.0.0", "x-owner": "team-a"},
            "paths": {
                "/pets": {
                    "get": {
                        "responses": {"200": {"description": "ok"}}
                    }
                },
                "x-internal": true
            }
        }))
        .unwrap();

        assert_eq!(doc.info.title, "Pets");
        assert_eq!(doc.info.extensions.0.get("x-owner"), Some(&json!("team-a")));
        assert_eq!(doc.paths.len(), 1);
        assert!(doc.paths["/pets"].get.is_some());
    }
}
