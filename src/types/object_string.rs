//! Objects that arrive as JSON text, e.g. a `filter` query parameter.
//!
//! The logical form is always the parsed object; the wire form is always a
//! JSON string.

use crate::error::ValidationError;
use crate::formats;
use crate::schema::{Checker, Coercion, Schema, StringOptions, Value, create};

/// Wire: an `ObjectString` string or an object matching `target`.
/// The string variant defaults to the serialized default of `target`.
pub(crate) fn schema(target: Schema, max_bytes: Option<usize>) -> Schema {
    let default = create(&target).to_json().to_string();
    Schema::union(vec![
        Schema::string(StringOptions::format(formats::OBJECT_STRING)).with_default(default),
        target.clone(),
    ])
    .with_coercion(Coercion::ObjectString {
        target: Box::new(target),
        max_bytes,
    })
}

fn parse(target: &Schema, max_bytes: Option<usize>, text: String) -> Result<Value, ValidationError> {
    if let Some(max) = max_bytes.filter(|max| text.len() > *max) {
        return Err(ValidationError::property(target, Value::String(text))
            .with_issue("", format!("Expected JSON text of at most {} bytes", max)));
    }

    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(json) => Ok(Value::from(json)),
        Err(e) => Err(ValidationError::property(target, Value::String(text))
            .with_issue("", format!("Invalid JSON: {}", e))),
    }
}

pub(crate) fn decode(
    checker: &Checker<'_>,
    target: &Schema,
    max_bytes: Option<usize>,
    value: Value,
) -> Result<Value, ValidationError> {
    match value {
        Value::String(text) => {
            let parsed = parse(target, max_bytes, text)?;
            checker.decode(target, parsed)
        }
        other => checker.decode(target, other),
    }
}

pub(crate) fn encode(
    checker: &Checker<'_>,
    target: &Schema,
    max_bytes: Option<usize>,
    value: Value,
) -> Result<Value, ValidationError> {
    let object = match value {
        Value::String(text) => parse(target, max_bytes, text)?,
        other => other,
    };
    let object = checker.validate(target, object)?;
    Ok(Value::String(object.to_json().to_string()))
}
