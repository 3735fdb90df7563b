//! Booleans that arrive as `"true"` / `"false"`.

use crate::error::ValidationError;
use crate::formats;
use crate::schema::{Checker, Coercion, Schema, StringOptions, Value};

/// Wire: a `boolean` string or a boolean. Logical: a boolean.
pub(crate) fn schema() -> Schema {
    Schema::union(vec![
        Schema::string(StringOptions::format(formats::BOOLEAN)),
        Schema::boolean(),
    ])
    .with_coercion(Coercion::BooleanString {
        target: Box::new(Schema::boolean()),
    })
}

pub(crate) fn decode(
    checker: &Checker<'_>,
    target: &Schema,
    value: Value,
) -> Result<Value, ValidationError> {
    match value {
        Value::String(s) => Ok(Value::Bool(s == "true")),
        other => checker.validate(target, other),
    }
}
