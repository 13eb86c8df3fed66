//! End-to-end comparison tests for apidiff-core
//!
//! Documents are built with `serde_json::json!` and compared through the
//! public API only.

use apidiff_core::openapi::ParameterLocation;
use apidiff_core::{breaking_only, classify, compare, Config, Diff, Empty, OpenApi};
use serde_json::{json, Value};

// ============================================================================
// Test Utilities
// ============================================================================

fn document(paths: Value) -> OpenApi {
    serde_json::from_value(json!({
        "openapi": "3.0.3",
        "info": {"title": "Items", "version": "1.0.0"},
        "paths": paths
    }))
    .expect("valid document")
}

fn items_operation(parameter: Value, response_schema: Value) -> Value {
    json!({
        "/items": {
            "get": {
                "parameters": [parameter],
                "responses": {
                    "200": {
                        "description": "ok",
                        "content": {"application/json": {"schema": response_schema}}
                    }
                }
            }
        }
    })
}

/// A document exercising most of the model: components, refs, security,
/// servers, tags and a recursive schema.
fn pet_store() -> OpenApi {
    serde_json::from_value(json!({
        "openapi": "3.0.3",
        "info": {"title": "Pet Store", "version": "1.0.0", "description": "Pets."},
        "servers": [{"url": "https://api.example.com/{stage}", "variables": {"stage": {"default": "prod", "enum": ["prod", "dev"]}}}],
        "tags": [{"name": "pets", "description": "Pet operations"}],
        "security": [{"apiKey": []}],
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "tags": ["pets"],
                    "parameters": [
                        {"$ref": "#/components/parameters/Limit"},
                        {"name": "tag", "in": "query", "explode": false, "schema": {"type": "array", "items": {"type": "string"}}}
                    ],
                    "responses": {
                        "200": {
                            "description": "A page of pets",
                            "headers": {"X-Next": {"schema": {"type": "string"}}},
                            "content": {"application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}}}
                        },
                        "default": {"$ref": "#/components/responses/Error"}
                    }
                },
                "post": {
                    "operationId": "createPet",
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
                    },
                    "responses": {"201": {"description": "Created"}},
                    "security": [{"oauth": ["pets:write"]}]
                }
            },
            "/pets/{id}": {
                "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "integer", "format": "int64"}}],
                "get": {"responses": {"200": {"description": "A pet", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}}}}
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": {"type": "string", "maxLength": 64},
                        "status": {"type": "string", "enum": ["available", "sold"]},
                        "owner": {"$ref": "#/components/schemas/Owner"},
                        "parent": {"$ref": "#/components/schemas/Pet"}
                    }
                },
                "Owner": {
                    "type": "object",
                    "properties": {"pets": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}}
                },
                "Error": {"type": "object", "properties": {"message": {"type": "string"}}}
            },
            "parameters": {
                "Limit": {"name": "limit", "in": "query", "schema": {"type": "integer", "maximum": 100}}
            },
            "responses": {
                "Error": {"description": "Error", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Error"}}}}
            },
            "securitySchemes": {
                "apiKey": {"type": "apiKey", "name": "X-Key", "in": "header"},
                "oauth": {"type": "oauth2", "flows": {"clientCredentials": {"tokenUrl": "https://auth.example.com/token", "scopes": {"pets:write": "write"}}}}
            }
        }
    }))
    .expect("valid document")
}

fn configs() -> Vec<Config> {
    vec![
        Config::default(),
        Config::default().excluding_examples().excluding_descriptions(),
        Config::default().breaking_changes_only(),
        Config::default().with_path_filter("^/pets").unwrap(),
        Config::default().with_extension_filter("^x-internal$").unwrap(),
    ]
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_reflexivity() {
    let store = pet_store();
    for config in configs() {
        let diff = compare(&config, &store, &store.clone());
        assert!(diff.is_empty(), "self-diff not empty: {:?}", diff);
    }
}

#[test]
fn test_collection_antisymmetry() {
    let first = document(json!({
        "/a": {"get": {"responses": {}}},
        "/b": {"get": {"responses": {}}}
    }));
    let second = document(json!({
        "/b": {"get": {"responses": {}}, "put": {"responses": {}}},
        "/c": {"get": {"responses": {}}}
    }));
    let config = Config::default();

    let forward = compare(&config, &first, &second).paths_diff.unwrap();
    let backward = compare(&config, &second, &first).paths_diff.unwrap();

    assert_eq!(forward.added, vec!["/c"]);
    assert_eq!(forward.deleted, vec!["/a"]);
    assert_eq!(forward.added, backward.deleted);
    assert_eq!(forward.deleted, backward.added);

    let forward_ops = forward.modified["/b"].operations_diff.as_ref().unwrap();
    let backward_ops = backward.modified["/b"].operations_diff.as_ref().unwrap();
    assert_eq!(forward_ops.added, vec!["PUT"]);
    assert_eq!(backward_ops.deleted, vec!["PUT"]);
    for key in &forward.added {
        assert!(!forward.deleted.contains(key));
    }
}

#[test]
fn test_explode_default_equivalence() {
    let string = json!({"type": "string"});
    let base = document(items_operation(
        json!({"name": "tags", "in": "query", "schema": {"type": "string"}}),
        string.clone(),
    ));
    let revision = document(items_operation(
        json!({"name": "tags", "in": "query", "explode": false, "schema": {"type": "string"}}),
        string,
    ));

    assert!(compare(&Config::default(), &base, &revision).is_empty());
}

#[test]
fn test_filter_soundness() {
    let base = document(json!({"/a": {"get": {"responses": {}}}}));
    let revision = document(json!({
        "/b": {"get": {"responses": {}}},
        "/c": {"post": {"responses": {}}}
    }));

    assert!(compare(&Config::default(), &base, &revision).paths_diff.is_some());

    let config = Config::default().with_path_filter("^/nothing$").unwrap();
    let diff = compare(&config, &base, &revision);
    assert!(diff.paths_diff.is_none());
    assert!(diff.is_empty());
}

#[test]
fn test_prefix_remap() {
    let base = document(json!({"/items": {"get": {"responses": {}}}}));
    let revision = document(json!({"/v2/items": {"get": {"responses": {}}}}));

    assert!(compare(&Config::default(), &base, &revision).paths_diff.is_some());
    let config = Config::default().with_path_prefix("/v2");
    assert!(compare(&config, &base, &revision).is_empty());
}

#[test]
fn test_breaking_only_monotonicity() {
    let base = pet_store();
    let mut revision: Value = serde_json::to_value(pet_store()).unwrap();
    // A mix of breaking and harmless edits.
    revision["info"]["description"] = json!("All the pets.");
    revision["paths"]["/pets"]["get"]["summary"] = json!("List pets");
    revision["paths"]["/pets"]["get"]["responses"]
        .as_object_mut()
        .unwrap()
        .shift_remove("default");
    revision["components"]["schemas"]["Pet"]["properties"]["status"]["enum"] = json!(["available"]);
    revision["components"]["parameters"]["Limit"]["schema"]["maximum"] = json!(50);
    let revision: OpenApi = serde_json::from_value(revision).unwrap();

    let config = Config::default();
    let full = compare(&config, &base, &revision);
    let pruned = breaking_only(&full);

    assert!(!full.is_empty());
    assert!(!pruned.is_empty());
    assert_ne!(full, pruned);
    assert!(pruned.info_diff.is_none());
    assert_eq!(classify(&pruned), classify(&full));
    assert_eq!(compare(&config.clone().breaking_changes_only(), &base, &revision), pruned);

    assert!(breaking_only(&Diff::default()).is_empty());
}

#[test]
fn test_cycle_safety() {
    let store = pet_store();
    assert!(compare(&Config::default(), &store, &store.clone()).is_empty());

    let mut revision: Value = serde_json::to_value(pet_store()).unwrap();
    revision["components"]["schemas"]["Pet"]["properties"]["age"] = json!({"type": "integer"});
    let revision: OpenApi = serde_json::from_value(revision).unwrap();

    let diff = compare(&Config::default(), &store, &revision);
    let schemas = diff.components_diff.unwrap().schemas_diff.unwrap();
    let pet = &schemas.modified["Pet"];
    assert_eq!(pet.properties_diff.as_ref().unwrap().added, vec!["age"]);
}

#[test]
fn test_yaml_document() {
    let yaml = r#"
openapi: 3.0.3
info:
  title: Items
  version: 1.0.0
paths:
  /items:
    get:
      responses:
        200:
          description: ok
        x-ignored: true
"#;
    let base: OpenApi = serde_yaml::from_str(yaml).unwrap();
    let revision = document(json!({
        "/items": {"get": {"responses": {"200": {"description": "ok"}}}}
    }));

    assert_eq!(base.paths["/items"].get.as_ref().unwrap().responses.len(), 1);
    assert!(compare(&Config::default(), &base, &revision).is_empty());
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_parameter_becomes_required() {
    let string = json!({"type": "string"});
    let base = document(items_operation(
        json!({"name": "name", "in": "query", "schema": {"type": "string"}}),
        string.clone(),
    ));
    let revision = document(items_operation(
        json!({"name": "name", "in": "query", "required": true, "schema": {"type": "string"}}),
        string,
    ));

    let diff = compare(&Config::default(), &base, &revision);
    let operation = &diff.paths_diff.as_ref().unwrap().modified["/items"]
        .operations_diff
        .as_ref()
        .unwrap()
        .modified["GET"];
    let param = &operation.parameters_diff.as_ref().unwrap().modified[&ParameterLocation::Query]
        ["name"];
    let required = param.required_diff.as_ref().unwrap();
    assert!(!required.from);
    assert!(required.to);

    let changes = classify(&diff);
    assert_eq!(changes.len(), 1);
    assert_eq!(
        changes[0].location,
        "paths > /items > GET > parameters > query.name"
    );
}

#[test]
fn test_scenario_description_excluded() {
    let string = json!({"type": "string"});
    let base = document(items_operation(
        json!({"name": "name", "in": "query", "description": "Item name", "schema": {"type": "string"}}),
        string.clone(),
    ));
    let revision = document(items_operation(
        json!({"name": "name", "in": "query", "description": "Name to filter by", "schema": {"type": "string"}}),
        string,
    ));

    assert!(!compare(&Config::default(), &base, &revision).is_empty());
    let config = Config::default().excluding_descriptions();
    assert!(compare(&config, &base, &revision).is_empty());
}

#[test]
fn test_scenario_path_added() {
    let base = document(json!({"/items": {"get": {"responses": {}}}}));
    let revision = document(json!({
        "/items": {"get": {"responses": {}}},
        "/widgets": {"get": {"responses": {}}}
    }));

    let diff = compare(&Config::default(), &base, &revision);
    let paths = diff.paths_diff.as_ref().unwrap();
    assert_eq!(paths.added, vec!["/widgets"]);
    assert!(paths.deleted.is_empty());
    assert!(paths.modified.is_empty());
    assert!(classify(&diff).is_empty());
    assert!(!diff.summary().breaking);
}

#[test]
fn test_scenario_response_enum_narrowed() {
    let param = json!({"name": "name", "in": "query", "schema": {"type": "string"}});
    let base = document(items_operation(
        param.clone(),
        json!({"type": "string", "enum": ["a", "b"]}),
    ));
    let revision = document(items_operation(param, json!({"type": "string", "enum": ["a"]})));

    let diff = compare(&Config::default(), &base, &revision);
    let response = &diff.paths_diff.as_ref().unwrap().modified["/items"]
        .operations_diff
        .as_ref()
        .unwrap()
        .modified["GET"]
        .responses_diff
        .as_ref()
        .unwrap()
        .modified["200"];
    let schema = response.content_diff.as_ref().unwrap().modified["application/json"]
        .schema_diff
        .as_ref()
        .unwrap();
    let values = schema.enum_diff.as_ref().unwrap();
    assert_eq!(values.deleted, vec![json!("b")]);
    assert!(values.added.is_empty());

    let changes = classify(&diff);
    assert_eq!(changes.len(), 1);
    assert_eq!(
        changes[0].location,
        "paths > /items > GET > responses > 200 > content > application/json > schema"
    );
}

fn secured(get: Value) -> OpenApi {
    serde_json::from_value(json!({
        "openapi": "3.0.3",
        "info": {"title": "Items", "version": "1.0.0"},
        "security": [{"apiKey": []}],
        "paths": {"/items": {"get": get}}
    }))
    .expect("valid document")
}

#[test]
fn test_operation_security_inherits_document() {
    let public = secured(json!({"security": [], "responses": {}}));
    let inherited = secured(json!({"responses": {}}));
    let explicit = secured(json!({"security": [{"apiKey": []}], "responses": {}}));
    let config = Config::default();

    // Dropping `security: []` puts the operation behind the global requirement
    let closed = compare(&config, &public, &inherited);
    assert!(!closed.is_empty());
    let changes = classify(&closed);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].location, "paths > /items > GET > security");
    assert_eq!(changes[0].message, "authentication became required");

    let opened = compare(&config, &inherited, &public);
    assert!(!opened.is_empty());
    assert!(classify(&opened).is_empty());

    // Restating the inherited requirement is not a change
    assert!(compare(&config, &inherited, &explicit).is_empty());
    assert!(compare(&config, &explicit, &inherited).is_empty());
}

#[test]
fn test_prefix_collisions_and_boundaries() {
    let base = document(json!({"/items": {"get": {"responses": {}}}}));
    let revision = document(json!({
        "/v2/items": {"get": {"deprecated": true, "responses": {}}},
        "/items": {"get": {"responses": {}}},
        "/v2beta/things": {"get": {"responses": {}}}
    }));

    let diff = compare(&Config::default().with_path_prefix("/v2"), &base, &revision);
    let paths = diff.paths_diff.expect("paths changed");
    assert_eq!(paths.added, vec!["/v2beta/things"]);
    assert!(paths.deleted.is_empty());
    let operations = paths.modified["/items"].operations_diff.as_ref().unwrap();
    assert!(operations.modified["GET"].deprecated_diff.is_some());
}

#[test]
fn test_summary_counts() {
    let base = pet_store();
    let mut revision: Value = serde_json::to_value(pet_store()).unwrap();
    revision["paths"]
        .as_object_mut()
        .unwrap()
        .insert("/owners".to_string(), json!({"get": {"responses": {}}}));
    revision["paths"]["/pets"]
        .as_object_mut()
        .unwrap()
        .shift_remove("post");
    let revision: OpenApi = serde_json::from_value(revision).unwrap();

    let summary = compare(&Config::default(), &base, &revision).summary();
    assert!(summary.diff);
    assert!(summary.breaking);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["details"]["paths"], json!({"added": 1, "deleted": 0, "modified": 1}));
    assert_eq!(json["details"]["endpoints"], json!({"added": 0, "deleted": 1, "modified": 0}));
}
