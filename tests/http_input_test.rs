//! Integration tests for query, form and response handling

use axum::http::StatusCode;
use axum::response::IntoResponse;
use tideway_types::http::{parse_form, parse_query};
use tideway_types::schema::{ArrayOptions, NumberOptions, ObjectOptions, StringOptions};
use tideway_types::{Schema, TypeBuilder, Value};

fn listing(t: &TypeBuilder) -> Schema {
    t.object(
        [
            ("page", t.maybe_empty(t.numeric(NumberOptions::default().minimum(1.0)))),
            ("tag", t.optional(t.array(t.string(StringOptions::default()), ArrayOptions::default()))),
        ],
        ObjectOptions::default(),
    )
}

fn handle(t: &TypeBuilder, raw: &str) -> axum::response::Response {
    let result = parse_query(raw).and_then(|query| Ok(t.decode(&listing(t), query)?));
    match result {
        Ok(value) => axum::Json(value).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_query_decodes_into_json_response() {
    let t = TypeBuilder::new();
    let response = handle(&t, "?page=3&tag=a&tag=b");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"page": 3, "tag": ["a", "b"]}));
}

#[tokio::test]
async fn test_invalid_query_is_unprocessable() {
    let t = TypeBuilder::new();
    let response = handle(&t, "page=0");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["found"], 0);
}

#[test]
fn test_single_tag_is_not_an_array() {
    let t = TypeBuilder::new();
    let query = parse_query("tag=a").unwrap();
    let err = t.decode(&listing(&t), query).unwrap_err();
    assert_eq!(err.issues[0].path, "/tag");
}

#[test]
fn test_form_body_with_boolean_strings() {
    let t = TypeBuilder::new();
    let schema = t.object(
        [
            ("remember", t.boolean_string()),
            ("age", t.numeric(NumberOptions::default())),
        ],
        ObjectOptions::default(),
    );

    let form = parse_form(b"remember=true&age=36").unwrap();
    let decoded = t.decode(&schema, form).unwrap();
    assert_eq!(decoded, Value::object([("remember", Value::Bool(true)), ("age", Value::from(36))]));
}
