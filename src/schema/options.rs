//! Option records attached to schema nodes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::check::Issue;
use super::{Schema, Value};
use crate::types::cookie::CookieOptions;

/// Constraints for string nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StringOptions {
    /// Name of a predicate in the format registry
    pub format: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Regular expression the whole value must match
    pub pattern: Option<String>,
}

impl StringOptions {
    /// Options tagging a string with a registered format
    pub fn format(name: impl Into<String>) -> Self {
        Self {
            format: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Constraints for number and integer nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberOptions {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
}

impl NumberOptions {
    pub fn range(minimum: f64, maximum: f64) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
            ..Default::default()
        }
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn multiple_of(mut self, step: f64) -> Self {
        self.multiple_of = Some(step);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Constraints for date nodes, as milliseconds since the Unix epoch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateOptions {
    pub minimum_timestamp: Option<i64>,
    pub maximum_timestamp: Option<i64>,
    pub exclusive_minimum_timestamp: Option<i64>,
    pub exclusive_maximum_timestamp: Option<i64>,
}

/// Constraints for object nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectOptions {
    /// `Some(false)` rejects properties that are not declared
    pub additional_properties: Option<bool>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
}

impl ObjectOptions {
    pub fn strict() -> Self {
        Self {
            additional_properties: Some(false),
            ..Default::default()
        }
    }
}

/// Constraints for array nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArrayOptions {
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: Option<bool>,
}

/// What a validation handler gets to build its response from
#[derive(Debug)]
pub struct ErrorInput<'a> {
    pub errors: &'a [Issue],
    /// Always `"validation"` for schema failures
    pub kind: &'a str,
    pub validator: &'a Schema,
    pub value: &'a Value,
}

pub type ErrorHandler = Arc<dyn Fn(&ErrorInput<'_>) -> serde_json::Value + Send + Sync>;

/// User-facing error override carried by a schema
///
/// Read when a [`ValidationError`](crate::ValidationError) is turned into a
/// response; never consulted while checking.
#[derive(Clone)]
pub enum ErrorOption {
    Text(String),
    Bool(bool),
    Number(f64),
    Object(serde_json::Value),
    Handler(ErrorHandler),
}

impl ErrorOption {
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&ErrorInput<'_>) -> serde_json::Value + Send + Sync + 'static,
    {
        Self::Handler(Arc::new(f))
    }
}

impl fmt::Debug for ErrorOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Object(v) => f.debug_tuple("Object").field(v).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl From<&str> for ErrorOption {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ErrorOption {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ErrorOption {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ErrorOption {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<serde_json::Value> for ErrorOption {
    fn from(value: serde_json::Value) -> Self {
        Self::Object(value)
    }
}

/// Metadata shared by every schema node
#[derive(Debug, Clone, Default)]
pub struct SchemaOptions {
    pub default: Option<Value>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub error: Option<ErrorOption>,
    /// Cookie directives attached by `t.cookie`; ignored by the checker
    pub cookie: Option<CookieOptions>,
}
