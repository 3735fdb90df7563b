//! Tests for decoding and encoding coercing types

use chrono::{TimeZone, Utc};
use serde_json::json;
use tideway_types::schema::{DateOptions, NumberOptions, ObjectOptions, StringOptions};
use tideway_types::{TypeBuilder, Value};

fn search_query(t: &TypeBuilder) -> tideway_types::Schema {
    t.object(
        [
            ("page", t.numeric(NumberOptions::default().minimum(1.0))),
            ("archived", t.boolean_string()),
            ("since", t.date(DateOptions::default())),
            (
                "filter",
                t.object_string(
                    [
                        ("name", t.string(StringOptions::default())),
                        ("tags", t.array(t.string(StringOptions::default()), Default::default())),
                    ],
                    ObjectOptions::default(),
                ),
            ),
            ("limit", t.maybe_empty(t.numeric(NumberOptions::range(1.0, 100.0)))),
        ],
        ObjectOptions::default(),
    )
}

#[test]
fn test_decode_query_of_strings() {
    let t = TypeBuilder::new();
    let schema = search_query(&t);

    let wire = Value::object([
        ("page", "2"),
        ("archived", "false"),
        ("since", "2024-03-05T14:30:00Z"),
        ("filter", r#"{"name":"Ada","tags":["math"]}"#),
    ]);

    let decoded = t.decode(&schema, wire).unwrap();
    assert_eq!(decoded.get("page"), Some(&Value::Number(2.0)));
    assert_eq!(decoded.get("archived"), Some(&Value::Bool(false)));
    assert_eq!(
        decoded.get("since"),
        Some(&Value::Date(Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()))
    );
    assert_eq!(
        decoded.get("filter").map(Value::to_json),
        Some(json!({"name": "Ada", "tags": ["math"]}))
    );
    assert_eq!(decoded.get("limit"), None);
}

#[test]
fn test_encode_then_decode_restores_logical_values() {
    let t = TypeBuilder::new();
    let schema = search_query(&t);

    let logical = Value::object([
        ("page", Value::from(4)),
        ("archived", Value::Bool(true)),
        ("since", Value::Date(Utc.with_ymd_and_hms(2023, 12, 25, 8, 0, 0).unwrap())),
        ("filter", Value::from(json!({"name": "Grace", "tags": []}))),
        ("limit", Value::Null),
    ]);

    let wire = t.encode(&schema, logical.clone()).unwrap();
    assert_eq!(
        wire.get("filter"),
        Some(&Value::from(r#"{"name":"Grace","tags":[]}"#))
    );
    assert_eq!(t.decode(&schema, wire).unwrap(), logical);
}

#[test]
fn test_constraints_apply_to_coerced_values() {
    let t = TypeBuilder::new();
    let schema = search_query(&t);

    let wire = Value::object([
        ("page", "0"),
        ("archived", "false"),
        ("since", "2024-03-05"),
        ("filter", r#"{"name":"Ada","tags":[]}"#),
    ]);

    let err = t.decode(&schema, wire).unwrap_err();
    assert_eq!(err.label, "property");
    assert_eq!(err.value, Value::Number(0.0));
    assert_eq!(err.schema.kind_name(), "number");
}

#[test]
fn test_wire_check_rejects_before_decoding() {
    let t = TypeBuilder::new();
    let schema = search_query(&t);

    let wire = Value::object([
        ("page", "two"),
        ("archived", "false"),
        ("since", "2024-03-05"),
        ("filter", "{}"),
    ]);

    let issues = t.errors(&schema, &wire);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "/page");
    assert!(t.decode(&schema, wire).is_err());
}

#[test]
fn test_create_builds_a_valid_default() {
    let t = TypeBuilder::new();
    let filter = t.object_string(
        [("name", t.string(StringOptions::default()))],
        ObjectOptions::default(),
    );

    let created = t.create(&filter);
    assert_eq!(created, Value::from(r#"{"name":""}"#));
    assert!(t.check(&filter, &created));
    assert_eq!(
        t.decode(&filter, created).unwrap(),
        Value::object([("name", "")])
    );
}

#[test]
fn test_custom_error_option_shapes_body() {
    let t = TypeBuilder::new();
    let schema = t.numeric(NumberOptions::range(1.0, 10.0)).with_error("page must be between 1 and 10");

    let err = t.decode(&schema, Value::from("11")).unwrap_err();
    assert_eq!(err.body(), json!({"error": "page must be between 1 and 10"}));
}

#[test]
fn test_property_error_option_shapes_body() {
    let t = TypeBuilder::new();
    let schema = t.object(
        [(
            "page",
            t.numeric(NumberOptions::default().minimum(1.0)).with_error("page must be numeric"),
        )],
        ObjectOptions::default(),
    );

    let err = t.decode(&schema, Value::object([("page", "abc")])).unwrap_err();
    assert_eq!(err.body(), json!({"error": "page must be numeric"}));
    assert_eq!(err.value, Value::from("abc"));
    assert_eq!(err.issues[0].path, "/page");

    let err = t.decode(&schema, Value::object([("page", "0")])).unwrap_err();
    assert_eq!(err.body(), json!({"error": "page must be numeric"}));
}
