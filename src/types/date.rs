//! Dates that arrive as strings in any of the accepted date grammars.

use crate::error::ValidationError;
use crate::formats::{self, DateOrder, parse_date};
use crate::schema::{Checker, Coercion, DateOptions, Schema, StringOptions, Value};

/// Wire: a date, a `date` string or a `date-time` string. Logical: a date.
pub(crate) fn schema(options: DateOptions, order: DateOrder) -> Schema {
    let target = Schema::date(options.clone());
    Schema::union(vec![
        Schema::date(options),
        Schema::string(StringOptions::format(formats::DATE)),
        Schema::string(StringOptions::format(formats::DATE_TIME)),
    ])
    .with_coercion(Coercion::Date {
        target: Box::new(target),
        order,
    })
}

pub(crate) fn decode(
    checker: &Checker<'_>,
    target: &Schema,
    order: DateOrder,
    value: Value,
) -> Result<Value, ValidationError> {
    match value {
        Value::Date(_) => Ok(value),
        Value::String(ref s) => match parse_date(s, order) {
            Some(date) => checker.validate(target, Value::Date(date)),
            None => Err(ValidationError::property(target, value).with_issue("", "Expected a valid date")),
        },
        other => Err(ValidationError::property(target, other).with_issue("", "Expected date")),
    }
}

/// Strings are turned into dates so both decoded and raw values encode
pub(crate) fn encode(target: &Schema, order: DateOrder, value: Value) -> Result<Value, ValidationError> {
    match value {
        Value::String(ref s) => match parse_date(s, order) {
            Some(date) => Ok(Value::Date(date)),
            None => Err(ValidationError::property(target, value).with_issue("", "Expected a valid date")),
        },
        other => Ok(other),
    }
}
