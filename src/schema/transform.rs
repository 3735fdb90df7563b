//! Decode and encode: moving values between wire and logical form.
//!
//! A node opts into coercion through its [`Coercion`] tag. Everything else
//! is walked structurally so coercing nodes nested in objects, arrays and
//! unions are reached.

use super::{Checker, Schema, SchemaKind, Value};
use crate::error::ValidationError;
use crate::formats::DateOrder;
use crate::types::{boolean_string, date, file, numeric, object_string};

/// Coercion strategy attached to a schema node
///
/// `target` is the plain logical schema the decoded value is re-checked
/// against, built from the caller's constraints.
#[derive(Debug, Clone)]
pub enum Coercion {
    /// Numeric string or number to number
    Numeric { target: Box<Schema> },
    /// Date string or date to date
    Date { target: Box<Schema>, order: DateOrder },
    /// `"true"`/`"false"` or boolean to boolean
    BooleanString { target: Box<Schema> },
    /// JSON string or object to object, and back to a JSON string
    ObjectString {
        target: Box<Schema>,
        max_bytes: Option<usize>,
    },
    /// One file or many to a list of files
    Files,
}

impl Coercion {
    fn decode(&self, checker: &Checker<'_>, value: Value) -> Result<Value, ValidationError> {
        match self {
            Coercion::Numeric { target } => numeric::decode(checker, target, value),
            Coercion::Date { target, order } => date::decode(checker, target, *order, value),
            Coercion::BooleanString { target } => boolean_string::decode(checker, target, value),
            Coercion::ObjectString { target, max_bytes } => {
                object_string::decode(checker, target, *max_bytes, value)
            }
            Coercion::Files => Ok(file::decode_files(value)),
        }
    }

    fn encode(&self, checker: &Checker<'_>, value: Value) -> Result<Value, ValidationError> {
        match self {
            Coercion::Numeric { .. } | Coercion::BooleanString { .. } | Coercion::Files => Ok(value),
            Coercion::Date { target, order } => date::encode(target, *order, value),
            Coercion::ObjectString { target, max_bytes } => {
                object_string::encode(checker, target, *max_bytes, value)
            }
        }
    }
}

impl Checker<'_> {
    /// Accept a wire value: check it, then coerce it to its logical form
    pub fn decode(&self, schema: &Schema, value: Value) -> Result<Value, ValidationError> {
        let value = self.validate(schema, value)?;
        self.decode_node(schema, value)
    }

    /// Produce a wire value: coerce from logical form, then check the result
    pub fn encode(&self, schema: &Schema, value: Value) -> Result<Value, ValidationError> {
        let encoded = self.encode_node(schema, value)?;
        self.validate(schema, encoded)
    }

    fn decode_node(&self, schema: &Schema, value: Value) -> Result<Value, ValidationError> {
        if let Some(coercion) = &schema.coercion {
            return coercion
                .decode(self, value)
                .map_err(|e| e.inherit_error(schema))
                .inspect_err(|e| tracing::debug!(expected = %e.schema.kind_name(), "Decode rejected value"));
        }

        match (&schema.kind, value) {
            (SchemaKind::Object { properties, .. }, Value::Object(mut map)) => {
                for (key, property) in properties {
                    if let Some(child) = map.remove(key) {
                        let decoded = self
                            .decode_node(property, child)
                            .map_err(|e| e.inherit_error(schema))?;
                        map.insert(key.clone(), decoded);
                    }
                }
                Ok(Value::Object(map))
            }
            (SchemaKind::Array { items, .. }, Value::Array(values)) => values
                .into_iter()
                .map(|item| self.decode_node(items, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
                .map_err(|e| e.inherit_error(schema)),
            (SchemaKind::Union(variants), value) => {
                match variants.iter().find(|variant| self.check(variant, &value)) {
                    Some(variant) => self.decode_node(variant, value),
                    None => Ok(value),
                }
            }
            (_, value) => Ok(value),
        }
    }

    fn encode_node(&self, schema: &Schema, value: Value) -> Result<Value, ValidationError> {
        if let Some(coercion) = &schema.coercion {
            return coercion.encode(self, value).map_err(|e| e.inherit_error(schema));
        }

        match (&schema.kind, value) {
            (SchemaKind::Object { properties, .. }, Value::Object(mut map)) => {
                for (key, property) in properties {
                    if let Some(child) = map.remove(key) {
                        let encoded = self.encode_node(property, child)?;
                        map.insert(key.clone(), encoded);
                    }
                }
                Ok(Value::Object(map))
            }
            (SchemaKind::Array { items, .. }, Value::Array(values)) => values
                .into_iter()
                .map(|item| self.encode_node(items, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            (SchemaKind::Union(variants), value) => {
                for variant in variants {
                    if let Ok(encoded) = self.encode_node(variant, value.clone()) {
                        if self.check(variant, &encoded) {
                            return Ok(encoded);
                        }
                    }
                }
                Ok(value)
            }
            (_, value) => Ok(value),
        }
    }
}
