//! Instantiating default values from schemas.

use chrono::{DateTime, Utc};

use super::{Schema, SchemaKind, Value};

/// Produce a value satisfying `schema` without any input
///
/// The node's `default` wins when set. Otherwise each kind yields its zero
/// value: objects get every required property, arrays get `min_items`
/// copies of their item default, unions take their first variant.
pub fn create(schema: &Schema) -> Value {
    if let Some(default) = &schema.options.default {
        return default.clone();
    }

    match &schema.kind {
        SchemaKind::Any | SchemaKind::Undefined | SchemaKind::Custom { .. } => Value::Undefined,
        SchemaKind::Null => Value::Null,
        SchemaKind::Boolean => Value::Bool(false),
        SchemaKind::String(_) => Value::String(String::new()),
        SchemaKind::Number(options) | SchemaKind::Integer(options) => {
            Value::Number(options.minimum.unwrap_or(0.0))
        }
        SchemaKind::Date(options) => {
            let millis = options.minimum_timestamp.unwrap_or(0);
            Value::Date(DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH))
        }
        SchemaKind::Literal(literal) => Value::from(literal.clone()),
        SchemaKind::Object { properties, .. } => Value::Object(
            properties
                .iter()
                .filter(|(_, property)| !property.accepts_undefined())
                .map(|(key, property)| (key.clone(), create(property)))
                .collect(),
        ),
        SchemaKind::Array { items, options } => {
            let count = options.min_items.unwrap_or(0);
            Value::Array((0..count).map(|_| create(items)).collect())
        }
        SchemaKind::Union(variants) => variants.first().map(create).unwrap_or(Value::Undefined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ArrayOptions, NumberOptions, ObjectOptions, StringOptions};
    use serde_json::json;

    #[test]
    fn test_default_wins() {
        let schema = Schema::number(NumberOptions::default()).with_default(7);
        assert_eq!(create(&schema), Value::Number(7.0));
    }

    #[test]
    fn test_object_creates_required_properties_only() {
        let schema = Schema::object(
            [
                ("name", Schema::string(StringOptions::default())),
                ("page", Schema::integer(NumberOptions { minimum: Some(1.0), ..Default::default() })),
                ("tags", Schema::array(Schema::string(StringOptions::default()), ArrayOptions::default())),
                ("note", Schema::union(vec![Schema::string(StringOptions::default()), Schema::undefined()])),
            ],
            ObjectOptions::default(),
        );

        assert_eq!(create(&schema).to_json(), json!({"name": "", "page": 1, "tags": []}));
    }

    #[test]
    fn test_union_takes_first_variant() {
        let schema = Schema::union(vec![Schema::null(), Schema::boolean()]);
        assert_eq!(create(&schema), Value::Null);
    }
}
