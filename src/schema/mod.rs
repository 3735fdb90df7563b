//! Schema trees and the engine that checks, creates, decodes and encodes
//! values against them.
//!
//! A [`Schema`] is plain data. Nodes that coerce between a wire and a logical
//! representation carry a [`Coercion`] tag, which the interpreter in
//! [`transform`] dispatches on. Format names and custom kinds are resolved
//! through the registries in [`crate::registry`] at check time.

pub mod check;
pub mod create;
pub mod options;
pub mod transform;
pub mod value;

pub use check::{Checker, Issue};
pub use create::create;
pub use options::{
    ArrayOptions, DateOptions, ErrorHandler, ErrorInput, ErrorOption, NumberOptions,
    ObjectOptions, SchemaOptions, StringOptions,
};
pub use transform::Coercion;
pub use value::{FileBlob, Value};

use std::collections::BTreeMap;

use crate::types::cookie::CookieOptions;

/// Shape of a schema node
#[derive(Debug, Clone)]
pub enum SchemaKind {
    Any,
    Null,
    Undefined,
    Boolean,
    String(StringOptions),
    Number(NumberOptions),
    Integer(NumberOptions),
    Date(DateOptions),
    Literal(serde_json::Value),
    Object {
        properties: BTreeMap<String, Schema>,
        options: ObjectOptions,
    },
    Array {
        items: Box<Schema>,
        options: ArrayOptions,
    },
    Union(Vec<Schema>),
    /// Scalar validated by a function from the type registry
    Custom {
        kind: String,
        options: serde_json::Value,
    },
}

/// A node in a schema tree
#[derive(Debug, Clone)]
pub struct Schema {
    pub kind: SchemaKind,
    pub options: SchemaOptions,
    pub coercion: Option<Coercion>,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            options: SchemaOptions::default(),
            coercion: None,
        }
    }

    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    pub fn null() -> Self {
        Self::new(SchemaKind::Null)
    }

    pub fn undefined() -> Self {
        Self::new(SchemaKind::Undefined)
    }

    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    pub fn string(options: StringOptions) -> Self {
        Self::new(SchemaKind::String(options))
    }

    pub fn number(options: NumberOptions) -> Self {
        Self::new(SchemaKind::Number(options))
    }

    pub fn integer(options: NumberOptions) -> Self {
        Self::new(SchemaKind::Integer(options))
    }

    pub fn date(options: DateOptions) -> Self {
        Self::new(SchemaKind::Date(options))
    }

    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        Self::new(SchemaKind::Literal(value.into()))
    }

    pub fn object<K, I>(properties: I, options: ObjectOptions) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Self::new(SchemaKind::Object {
            properties: properties.into_iter().map(|(k, s)| (k.into(), s)).collect(),
            options,
        })
    }

    pub fn array(items: Schema, options: ArrayOptions) -> Self {
        Self::new(SchemaKind::Array {
            items: Box::new(items),
            options,
        })
    }

    pub fn union(variants: Vec<Schema>) -> Self {
        Self::new(SchemaKind::Union(variants))
    }

    pub fn custom(kind: impl Into<String>, options: serde_json::Value) -> Self {
        Self::new(SchemaKind::Custom {
            kind: kind.into(),
            options,
        })
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.options.default = Some(value.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<ErrorOption>) -> Self {
        self.options.error = Some(error.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    pub(crate) fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    pub(crate) fn with_cookie(mut self, cookie: CookieOptions) -> Self {
        self.options.cookie = Some(cookie);
        self
    }

    /// Cookie directives attached by `t.cookie`
    pub fn cookie_options(&self) -> Option<&CookieOptions> {
        self.options.cookie.as_ref()
    }

    /// Whether a missing value satisfies this node
    ///
    /// Object properties whose schema accepts `Undefined` are optional.
    pub fn accepts_undefined(&self) -> bool {
        match &self.kind {
            SchemaKind::Any | SchemaKind::Undefined => true,
            SchemaKind::Union(variants) => variants.iter().any(Schema::accepts_undefined),
            _ => false,
        }
    }

    /// Short name of the node's shape, used in messages
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            SchemaKind::Any => "any",
            SchemaKind::Null => "null",
            SchemaKind::Undefined => "undefined",
            SchemaKind::Boolean => "boolean",
            SchemaKind::String(_) => "string",
            SchemaKind::Number(_) => "number",
            SchemaKind::Integer(_) => "integer",
            SchemaKind::Date(_) => "date",
            SchemaKind::Literal(_) => "literal",
            SchemaKind::Object { .. } => "object",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Union(_) => "union",
            SchemaKind::Custom { kind, .. } => kind,
        }
    }

    /// Declared properties of an object node
    pub fn properties(&self) -> Option<&BTreeMap<String, Schema>> {
        match &self.kind {
            SchemaKind::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }
}
