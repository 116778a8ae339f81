//! OpenAPI 3.0 description of the HTTP surface.
//!
//! The document is assembled from a route table so every mounted endpoint
//! appears once. [`public_document`] strips internal paths (feature flags and
//! admin) before it is served at `/schema/`.

use serde_json::{json, Map, Value};

/// Path prefixes that never appear in the published schema.
pub const INTERNAL_PREFIXES: &[&str] = &["/v1/feature-flags", "/v1/admin"];

/// One documented operation.
struct Operation {
    method: &'static str,
    path: &'static str,
    tag: &'static str,
    summary: &'static str,
    auth: bool,
    status: &'static str,
}

const fn op(
    method: &'static str,
    path: &'static str,
    tag: &'static str,
    summary: &'static str,
    auth: bool,
    status: &'static str,
) -> Operation {
    Operation {
        method,
        path,
        tag,
        summary,
        auth,
        status,
    }
}

const OPERATIONS: &[Operation] = &[
    // Manufacturers
    op("get", "/v1/manufacturers/", "manufacturers", "List manufacturers", false, "200"),
    op("post", "/v1/manufacturers/", "manufacturers", "Create a manufacturer", true, "201"),
    op("get", "/v1/manufacturers/{id}/", "manufacturers", "Retrieve a manufacturer", false, "200"),
    op("put", "/v1/manufacturers/{id}/", "manufacturers", "Replace a manufacturer", true, "200"),
    op("patch", "/v1/manufacturers/{id}/", "manufacturers", "Partially update a manufacturer", true, "200"),
    op("delete", "/v1/manufacturers/{id}/", "manufacturers", "Delete a manufacturer and its aircraft", true, "204"),
    op("get", "/v1/manufacturers/{id}/aircraft/", "manufacturers", "List a manufacturer's aircraft", false, "200"),
    // Aircraft
    op("get", "/v1/aircraft/", "aircraft", "List aircraft", false, "200"),
    op("post", "/v1/aircraft/", "aircraft", "Create an aircraft", true, "201"),
    op("get", "/v1/aircraft/compare/", "aircraft", "Compare aircraft by id", false, "200"),
    op("get", "/v1/aircraft/{id}/", "aircraft", "Retrieve an aircraft with its MOSAIC analysis", false, "200"),
    op("put", "/v1/aircraft/{id}/", "aircraft", "Replace an aircraft", true, "200"),
    op("patch", "/v1/aircraft/{id}/", "aircraft", "Partially update an aircraft", true, "200"),
    op("delete", "/v1/aircraft/{id}/", "aircraft", "Delete an aircraft", true, "204"),
    // Engines
    op("get", "/v1/engines/", "engines", "List engines", false, "200"),
    op("post", "/v1/engines/", "engines", "Create an engine", true, "201"),
    op("get", "/v1/engines/{id}/", "engines", "Retrieve an engine", false, "200"),
    op("put", "/v1/engines/{id}/", "engines", "Replace an engine", true, "200"),
    op("patch", "/v1/engines/{id}/", "engines", "Partially update an engine", true, "200"),
    op("delete", "/v1/engines/{id}/", "engines", "Delete an engine", true, "204"),
    // Corrections
    op("post", "/v1/corrections/", "corrections", "Submit a data correction", false, "201"),
    op("get", "/v1/corrections/{id}/", "corrections", "Retrieve a correction", false, "200"),
    // Feature flags
    op("get", "/v1/feature-flags/", "feature-flags", "Map of flag states", false, "200"),
    op("get", "/v1/feature-flags/detailed/", "feature-flags", "Flags with descriptions", false, "200"),
    op("get", "/v1/feature-flags/{key}/", "feature-flags", "Retrieve one flag", false, "200"),
    // Admin
    op("get", "/v1/admin/feature-flags/", "admin", "List stored flags", true, "200"),
    op("put", "/v1/admin/feature-flags/{key}/", "admin", "Set a flag's state", true, "200"),
    op("get", "/v1/admin/feature-flags/{key}/history/", "admin", "Flag change history", true, "200"),
    op("get", "/v1/admin/corrections/", "admin", "List corrections", true, "200"),
    op("get", "/v1/admin/corrections/{id}/", "admin", "Retrieve a correction for review", true, "200"),
    op("post", "/v1/admin/corrections/{id}/approve/", "admin", "Approve a correction", true, "200"),
    op("post", "/v1/admin/corrections/{id}/reject/", "admin", "Reject a correction", true, "200"),
    op("post", "/v1/admin/corrections/{id}/implement/", "admin", "Mark a correction implemented", true, "200"),
];

fn path_parameters(path: &str) -> Vec<Value> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .map(|name| {
            let schema = if name == "id" {
                json!({"type": "integer", "format": "int64"})
            } else {
                json!({"type": "string"})
            };
            json!({"name": name, "in": "path", "required": true, "schema": schema})
        })
        .collect()
}

fn operation_value(op: &Operation) -> Value {
    let mut responses = Map::new();
    let description = if op.status == "204" {
        "No content"
    } else {
        "Success"
    };
    responses.insert(op.status.to_string(), json!({"description": description}));
    responses.insert(
        "default".to_string(),
        json!({"$ref": "#/components/responses/Error"}),
    );

    let mut value = json!({
        "tags": [op.tag],
        "summary": op.summary,
        "parameters": path_parameters(op.path),
        "responses": responses,
    });
    if op.auth {
        value["security"] = json!([{"bearerAuth": []}]);
    }
    value
}

/// The complete document, internal paths included.
pub fn full_document() -> Value {
    let mut paths = Map::new();
    for op in OPERATIONS {
        let entry = paths
            .entry(op.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        entry[op.method] = operation_value(op);
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "MOSAIC Aircraft Catalog API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Aircraft performance data and FAA MOSAIC eligibility.",
        },
        "paths": paths,
        "components": {
            "securitySchemes": {
                "bearerAuth": {"type": "http", "scheme": "bearer", "bearerFormat": "JWT"}
            },
            "responses": {
                "Error": {
                    "description": "Error",
                    "content": {"application/json": {"schema": {
                        "type": "object",
                        "properties": {
                            "error": {"type": "string"},
                            "code": {"type": "string"},
                            "fields": {"type": "object"}
                        },
                        "required": ["error", "code"]
                    }}}
                }
            }
        }
    })
}

/// Remove every path under one of [`INTERNAL_PREFIXES`].
pub fn exclude_internal_paths(mut document: Value) -> Value {
    if let Some(paths) = document.get_mut("paths").and_then(Value::as_object_mut) {
        paths.retain(|path, _| {
            !INTERNAL_PREFIXES
                .iter()
                .any(|prefix| path.starts_with(prefix))
        });
    }
    document
}

/// The document served at `/schema/`.
pub fn public_document() -> Value {
    exclude_internal_paths(full_document())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_document_lists_every_operation() {
        let doc = full_document();
        let paths = doc["paths"].as_object().unwrap();
        let count: usize = paths
            .values()
            .map(|p| p.as_object().unwrap().len())
            .sum();
        assert_eq!(count, OPERATIONS.len());
        assert!(paths.contains_key("/v1/admin/corrections/"));
    }

    #[test]
    fn public_document_drops_internal_paths() {
        let doc = public_document();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths
            .keys()
            .all(|p| !p.starts_with("/v1/feature-flags") && !p.starts_with("/v1/admin")));
        assert!(paths.contains_key("/v1/aircraft/compare/"));
        assert!(paths.contains_key("/v1/corrections/"));
    }

    #[test]
    fn path_parameters_are_typed() {
        let params = path_parameters("/v1/aircraft/{id}/");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0]["schema"]["type"], "integer");

        let params = path_parameters("/v1/feature-flags/{key}/");
        assert_eq!(params[0]["schema"]["type"], "string");
    }

    #[test]
    fn write_operations_require_bearer_auth() {
        let doc = full_document();
        assert!(doc["paths"]["/v1/aircraft/"]["post"]["security"].is_array());
        assert!(doc["paths"]["/v1/aircraft/"]["get"].get("security").is_none());
    }
}
