//! Benchmark for comparing large documents.

use apidiff_core::{compare, Config, OpenApi};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Map, Value};

/// A document with `count` paths, each with a parameterised GET and a POST
/// sharing a recursive component schema.
fn synthetic_document(count: usize, revision: bool) -> OpenApi {
    let mut paths = Map::new();
    for index in 0..count {
        let limit = if revision && index % 10 == 0 { 50 } else { 100 };
        paths.insert(
            format!("/resources{}/{{id}}", index),
            json!({
                "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}],
                "get": {
                    "operationId": format!("getResource{}", index),
                    "parameters": [{"name": "limit", "in": "query", "schema": {"type": "integer", "maximum": limit}}],
                    "responses": {
                        "200": {"description": "ok", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Node"}}}}
                    }
                },
                "post": {
                    "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Node"}}}},
                    "responses": {"201": {"description": "created"}}
                }
            }),
        );
    }

    let mut node_properties = json!({
        "name": {"type": "string"},
        "children": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}
    });
    if revision {
        node_properties["weight"] = json!({"type": "number"});
    }

    serde_json::from_value(json!({
        "openapi": "3.0.3",
        "info": {"title": "Synthetic", "version": "1.0.0"},
        "paths": Value::Object(paths),
        "components": {
            "schemas": {
                "Node": {"type": "object", "properties": node_properties}
            }
        }
    }))
    .expect("synthetic document")
}

fn bench_self_diff(c: &mut Criterion) {
    let document = synthetic_document(500, false);
    let config = Config::default();

    c.bench_function("self_diff_500_paths", |b| {
        b.iter(|| black_box(compare(&config, black_box(&document), black_box(&document))))
    });
}

fn bench_revision_diff(c: &mut Criterion) {
    let base = synthetic_document(500, false);
    let revision = synthetic_document(500, true);
    let config = Config::default();

    c.bench_function("revision_diff_500_paths", |b| {
        b.iter(|| black_box(compare(&config, black_box(&base), black_box(&revision))))
    });

    c.bench_function("revision_summary_500_paths", |b| {
        b.iter(|| black_box(compare(&config, &base, &revision).summary()))
    });
}

criterion_group!(benches, bench_self_diff, bench_revision_diff);
criterion_main!(benches);
