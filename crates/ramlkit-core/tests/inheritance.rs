//! Inheritance of parameters, bodies and responses through resource types
//! and traits

use std::collections::HashMap;

use ramlkit_core::{
    build_list, collect_ancestors, merge_all, Body, Config, Context, EntityKind, ErrorKind,
    ErrorSink, Header, QueryParameter, Response, UriParameter,
};
use serde_json::{json, Number, Value as JsonValue};

fn build<T: ramlkit_core::Normalize>(raw: JsonValue, errors: &mut ErrorSink) -> Vec<T> {
    let ctx = Context::default();
    build_list::<T>("/users", "declarations", Some(&raw), &Config::default(), errors, &ctx)
        .unwrap()
        .unwrap_or_default()
}

#[test]
fn test_query_parameters_through_traits() {
    let mut errors = ErrorSink::new();
    let mut catalog: HashMap<String, Vec<QueryParameter>> = HashMap::new();
    catalog.insert(
        "paged".to_string(),
        build(
            json!({
                "page": {"type": "integer", "minimum": 1, "description": "Page number"},
                "per_page": {"type": "integer", "maximum": 100, "default": 20}
            }),
            &mut errors,
        ),
    );
    catalog.insert(
        "searchable".to_string(),
        build(
            json!({"page": {"type": "number", "example": 2}, "q": {"required": true}}),
            &mut errors,
        ),
    );

    let mut local: Vec<QueryParameter> = build(
        json!({"page": {"description": "Which page"}, "q": {}, "sort": {}}),
        &mut errors,
    );
    let ancestors = collect_ancestors(
        &catalog,
        &["paged", "searchable"],
        EntityKind::QueryParameter,
        "is",
        &Config::default(),
        &mut errors,
    )
    .unwrap();
    merge_all(&mut local, &ancestors);
    assert!(errors.is_empty(), "{:?}", errors);

    let page = &local[0];
    assert_eq!(page.description.as_deref(), Some("Which page"));
    // the nearest declaring ancestor wins
    assert_eq!(page.param_type(), "integer");
    assert_eq!(page.minimum, Some(Number::from(1)));
    // attributes the nearest ancestor leaves unset come from further out
    assert_eq!(page.example, Some(json!(2)));

    let q = &local[1];
    assert!(q.required());
    assert_eq!(q.param_type(), "string");

    let sort = &local[2];
    assert_eq!(sort, &build::<QueryParameter>(json!({"sort": {}}), &mut errors)[0]);
}

#[test]
fn test_uri_parameters_keep_required_default() {
    let mut errors = ErrorSink::new();
    let mut local: Vec<UriParameter> = build(json!({"id": {}}), &mut errors);
    let ancestors: Vec<UriParameter> =
        build(json!({"id": {"type": "integer", "minimum": 0}}), &mut errors);
    merge_all(&mut local, &ancestors);

    assert!(local[0].required());
    assert_eq!(local[0].param_type(), "integer");
    assert_eq!(local[0].minimum, Some(Number::from(0)));
}

#[test]
fn test_headers_inherit_method_scope() {
    let mut errors = ErrorSink::new();
    let mut local: Vec<Header> = build(json!({"X-Request-Id": {}}), &mut errors);

    let raw = json!({"X-Tenant": {"description": "Tenant header", "type": "string"}});
    let ancestors = build_list::<Header>(
        "post /users",
        "headers",
        Some(&raw),
        &Config::default(),
        &mut errors,
        &Context::default().with_method("post"),
    )
    .unwrap()
    .unwrap();
    merge_all(&mut local, &ancestors);

    assert_eq!(local[0].name, "X-Request-Id");
    assert_eq!(local[0].method.as_deref(), Some("post"));
    assert_eq!(local[0].description.as_deref(), Some("Tenant header"));
}

#[test]
fn test_responses_and_bodies_from_resource_type() {
    let mut errors = ErrorSink::new();
    let collection: Vec<Response> = build(
        json!({
            "200": {
                "description": "The collection",
                "body": {"application/json": {"schema": "{\"type\": \"array\"}"}}
            },
            "404": {"description": "Not found"}
        }),
        &mut errors,
    );
    let mut local: Vec<Response> = build(
        json!({"200": {"body": {"application/json": {"example": "[]"}}}, "404": {}}),
        &mut errors,
    );
    merge_all(&mut local, &collection);
    assert!(errors.is_empty());

    assert_eq!(local[0].description.as_deref(), Some("The collection"));
    assert_eq!(local[1].description.as_deref(), Some("Not found"));
    // a locally declared body list is kept as a whole
    let body = &local[0].body.as_ref().unwrap()[0];
    assert!(body.schema.is_none());

    let mut bodies: Vec<Body> = local[0].body.clone().unwrap();
    let inherited = collection[0].body.clone().unwrap();
    merge_all(&mut bodies, &inherited);
    assert_eq!(bodies[0].schema, Some(json!({"type": "array"})));
    assert_eq!(bodies[0].example, Some(json!([])));
}

#[test]
fn test_unknown_trait_reference() {
    let catalog: HashMap<String, Vec<QueryParameter>> = HashMap::new();
    let mut errors = ErrorSink::new();
    let ancestors = collect_ancestors(
        &catalog,
        &["secured"],
        EntityKind::QueryParameter,
        "is",
        &Config::default(),
        &mut errors,
    )
    .unwrap();
    assert!(ancestors.is_empty());
    assert_eq!(errors.errors()[0].kind, ErrorKind::Reference);
    assert_eq!(errors.errors()[0].fields, vec!["is".to_string()]);
}
