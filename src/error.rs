use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::schema::{ErrorInput, ErrorOption, Issue, Schema, Value};

/// A value violated a schema during decode, encode or validation
///
/// Carries the violated schema and the offending value so the response can
/// be shaped by the schema's `error` option.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid {label}: expected {}, found {}", .schema.kind_name(), .value.kind_name())]
pub struct ValidationError {
    /// What failed; always `"property"` for schema violations
    pub label: &'static str,
    pub schema: Box<Schema>,
    pub value: Value,
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn property(schema: &Schema, value: Value) -> Self {
        Self {
            label: "property",
            schema: Box::new(schema.clone()),
            value,
            issues: Vec::new(),
        }
    }

    pub fn with_issues(mut self, issues: Vec<Issue>) -> Self {
        self.issues.extend(issues);
        self
    }

    pub fn with_issue(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.issues.push(Issue::new(path, message));
        self
    }

    /// Adopt the `error` option of an enclosing schema when the violated
    /// schema has none of its own
    pub fn inherit_error(mut self, outer: &Schema) -> Self {
        if self.schema.options.error.is_none() {
            self.schema.options.error = outer.options.error.clone();
        }
        self
    }

    /// JSON body describing this failure
    pub fn body(&self) -> serde_json::Value {
        match &self.schema.options.error {
            Some(ErrorOption::Text(text)) => json!({ "error": text }),
            Some(ErrorOption::Bool(b)) => json!({ "error": b }),
            Some(ErrorOption::Number(n)) => json!({ "error": n }),
            Some(ErrorOption::Object(body)) => body.clone(),
            Some(ErrorOption::Handler(handler)) => handler(&ErrorInput {
                errors: &self.issues,
                kind: "validation",
                validator: &self.schema,
                value: &self.value,
            }),
            None => json!({
                "error": "Validation failed",
                "on": self.label,
                "expected": self.schema.kind_name(),
                "found": self.value.to_json(),
                "issues": self.issues,
            }),
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self.body())).into_response()
    }
}

/// Errors raised while building schemas or reading request input
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid urlencoded input: {0}")]
    Urlencoded(#[from] serde_urlencoded::de::Error),

    #[error("Invalid multipart input: {0}")]
    Multipart(String),
}

impl TypesError {
    pub fn invalid_option(msg: impl Into<String>) -> Self {
        Self::InvalidOption(msg.into())
    }

    pub fn multipart(msg: impl Into<String>) -> Self {
        Self::Multipart(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            TypesError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for TypesError {
    fn into_response(self) -> Response {
        match self {
            TypesError::Validation(err) => err.into_response(),
            other => {
                let status = other.status_code();
                tracing::debug!(error = %other, "Rejecting request input");
                (status, Json(json!({ "error": other.to_string() }))).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TypesError>;
