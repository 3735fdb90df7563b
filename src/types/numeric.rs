//! Numbers that arrive as strings: `?page=2`.

use crate::error::ValidationError;
use crate::formats::{self, to_number};
use crate::schema::{Checker, Coercion, NumberOptions, Schema, StringOptions, Value};

/// Wire: a `numeric` string or a number. Logical: a number.
pub(crate) fn schema(options: NumberOptions) -> Schema {
    let target = Schema::number(options.clone());
    Schema::union(vec![
        Schema::string(StringOptions::format(formats::NUMERIC)),
        Schema::number(options),
    ])
    .with_coercion(Coercion::Numeric {
        target: Box::new(target),
    })
}

/// A string that does not convert is handed back unchanged; the
/// surrounding check decides whether that is acceptable.
pub(crate) fn decode(
    checker: &Checker<'_>,
    target: &Schema,
    value: Value,
) -> Result<Value, ValidationError> {
    let number = match &value {
        Value::Number(n) => *n,
        Value::String(s) => match to_number(s) {
            Some(n) => n,
            None => return Ok(value),
        },
        _ => return Ok(value),
    };

    checker.validate(target, Value::Number(number))
}
