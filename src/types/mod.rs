//! The type builder.
//!
//! [`TypeBuilder`] makes schemas for request data that arrives as text or
//! blobs: numbers and booleans in query strings, dates in any common
//! grammar, JSON objects packed into a single field, uploaded files and
//! cookies. Each coercing schema accepts the wire form, decodes to the
//! logical form and encodes back.
//!
//! ```rust
//! use tideway_types::{TypeBuilder, Value};
//! use tideway_types::schema::{NumberOptions, ObjectOptions};
//!
//! let t = TypeBuilder::new();
//! let query = t.object(
//!     [("page", t.numeric(NumberOptions::default().minimum(1.0)))],
//!     ObjectOptions::default(),
//! );
//!
//! let decoded = t.decode(&query, Value::object([("page", "2")])).unwrap();
//! assert_eq!(decoded.get("page"), Some(&Value::Number(2.0)));
//! ```

pub(crate) mod boolean_string;
pub mod cookie;
pub(crate) mod date;
pub mod file;
pub(crate) mod nullable;
pub(crate) mod numeric;
pub(crate) mod object_string;

pub use self::cookie::{CookieOptions, CookiePriority, CookieSameSite, CookieSchemaOptions, Secrets};
pub use self::file::{FileOptions, FileSize, FileType, FilesOptions};

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::config::TypesConfig;
use crate::error::ValidationError;
use crate::formats::bootstrap;
use crate::registry::{FormatRegistry, TypeRegistry};
use crate::schema::{
    ArrayOptions, Checker, DateOptions, Issue, NumberOptions, ObjectOptions, Schema,
    StringOptions, Value,
};

/// Builds schemas and runs them against values
///
/// Construction registers the built-in formats and the `File`/`Files`
/// kinds with the builder's registries, keeping any entries that are
/// already there.
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    formats: Arc<FormatRegistry>,
    kinds: Arc<TypeRegistry>,
    config: TypesConfig,
}

static GLOBAL_BUILDER: OnceLock<TypeBuilder> = OnceLock::new();

/// The process-wide builder over the global registries
///
/// Configured from the environment on first use.
pub fn t() -> &'static TypeBuilder {
    GLOBAL_BUILDER.get_or_init(|| {
        TypeBuilder::with_registries(
            FormatRegistry::global(),
            TypeRegistry::global(),
            TypesConfig::from_env(),
        )
    })
}

impl TypeBuilder {
    /// A builder with private registries and default settings
    pub fn new() -> Self {
        Self::with_config(TypesConfig::default())
    }

    pub fn with_config(config: TypesConfig) -> Self {
        Self::with_registries(
            Arc::new(FormatRegistry::new()),
            Arc::new(TypeRegistry::new()),
            config,
        )
    }

    /// A builder over shared registries
    pub fn with_registries(
        formats: Arc<FormatRegistry>,
        kinds: Arc<TypeRegistry>,
        config: TypesConfig,
    ) -> Self {
        bootstrap(&formats, config.date_order);
        file::register_kinds(&kinds);
        Self {
            formats,
            kinds,
            config,
        }
    }

    pub fn config(&self) -> &TypesConfig {
        &self.config
    }

    pub fn formats(&self) -> &Arc<FormatRegistry> {
        &self.formats
    }

    pub fn kinds(&self) -> &Arc<TypeRegistry> {
        &self.kinds
    }

    pub fn checker(&self) -> Checker<'_> {
        Checker::new(&self.formats, &self.kinds)
    }

    // Coercing types

    /// A number, or a string that converts to one
    pub fn numeric(&self, options: NumberOptions) -> Schema {
        numeric::schema(options)
    }

    /// A date, or a string in a supported date grammar
    pub fn date(&self, options: DateOptions) -> Schema {
        date::schema(options, self.config.date_order)
    }

    /// A boolean, or `"true"` / `"false"`
    pub fn boolean_string(&self) -> Schema {
        boolean_string::schema()
    }

    /// An object, or JSON text describing one
    pub fn object_string<K, I>(&self, properties: I, options: ObjectOptions) -> Schema
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        object_string::schema(
            Schema::object(properties, options),
            self.config.max_object_string_bytes,
        )
    }

    pub fn file(&self, options: FileOptions) -> Schema {
        file::file_schema(&options)
    }

    /// One file or several; always decodes to a list
    pub fn files(&self, options: FilesOptions) -> Schema {
        file::files_schema(&options)
    }

    pub fn nullable(&self, schema: Schema) -> Schema {
        nullable::nullable(schema)
    }

    pub fn maybe_empty(&self, schema: Schema) -> Schema {
        nullable::maybe_empty(schema)
    }

    /// An object schema carrying cookie directives
    pub fn cookie<K, I>(&self, properties: I, options: CookieSchemaOptions) -> Schema
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        let properties: BTreeMap<String, Schema> =
            properties.into_iter().map(|(k, s)| (k.into(), s)).collect();
        cookie::schema(properties, options)
    }

    // Plain schemas

    pub fn any(&self) -> Schema {
        Schema::any()
    }

    pub fn null(&self) -> Schema {
        Schema::null()
    }

    pub fn undefined(&self) -> Schema {
        Schema::undefined()
    }

    pub fn boolean(&self) -> Schema {
        Schema::boolean()
    }

    pub fn string(&self, options: StringOptions) -> Schema {
        Schema::string(options)
    }

    pub fn number(&self, options: NumberOptions) -> Schema {
        Schema::number(options)
    }

    pub fn integer(&self, options: NumberOptions) -> Schema {
        Schema::integer(options)
    }

    /// A date value with no string form
    pub fn date_value(&self, options: DateOptions) -> Schema {
        Schema::date(options)
    }

    pub fn literal(&self, value: impl Into<serde_json::Value>) -> Schema {
        Schema::literal(value)
    }

    pub fn object<K, I>(&self, properties: I, options: ObjectOptions) -> Schema
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Schema::object(properties, options)
    }

    pub fn array(&self, items: Schema, options: ArrayOptions) -> Schema {
        Schema::array(items, options)
    }

    pub fn union(&self, variants: Vec<Schema>) -> Schema {
        Schema::union(variants)
    }

    /// Present and valid, or missing
    pub fn optional(&self, schema: Schema) -> Schema {
        nullable::optional(schema)
    }

    // Engine

    pub fn check(&self, schema: &Schema, value: &Value) -> bool {
        self.checker().check(schema, value)
    }

    pub fn errors(&self, schema: &Schema, value: &Value) -> Vec<Issue> {
        self.checker().errors(schema, value)
    }

    pub fn validate(&self, schema: &Schema, value: Value) -> Result<Value, ValidationError> {
        self.checker().validate(schema, value)
    }

    /// A value satisfying `schema` built from defaults and minimums
    pub fn create(&self, schema: &Schema) -> Value {
        crate::schema::create(schema)
    }

    pub fn decode(&self, schema: &Schema, value: Value) -> Result<Value, ValidationError> {
        self.checker().decode(schema, value)
    }

    pub fn encode(&self, schema: &Schema, value: Value) -> Result<Value, ValidationError> {
        self.checker().encode(schema, value)
    }
}

impl Default for TypeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{DateOrder, FULL_FORMATS};
    use crate::registry::FormatPredicate;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_construction_registers_formats_and_kinds() {
        let t = TypeBuilder::new();
        assert_eq!(t.formats().len(), FULL_FORMATS.len() + 3);
        assert!(t.kinds().has(file::FILE_KIND));
        assert!(t.kinds().has(file::FILES_KIND));
    }

    #[test]
    fn test_shared_registries_keep_existing_entries() {
        let formats = Arc::new(FormatRegistry::new());
        let strict: FormatPredicate = Arc::new(|s: &str| s == "yes");
        formats.set_if_absent("boolean", strict);

        let kinds = Arc::new(TypeRegistry::new());
        let first = TypeBuilder::with_registries(formats.clone(), kinds.clone(), TypesConfig::default());
        let second = TypeBuilder::with_registries(formats.clone(), kinds, TypesConfig::default());

        assert_eq!(first.formats().len(), second.formats().len());
        assert_eq!(formats.check("boolean", "true"), Some(false));
        assert!(!second.check(&second.boolean_string(), &Value::from("true")));
    }

    #[test]
    fn test_month_first_config() {
        let t = TypeBuilder::with_config(TypesConfig {
            date_order: DateOrder::MonthFirst,
            ..Default::default()
        });
        let decoded = t.decode(&t.date(DateOptions::default()), Value::from("12/25/2024")).unwrap();
        assert_eq!(decoded, Value::Date(Utc.with_ymd_and_hms(2024, 12, 25, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_object_string_limit_from_config() {
        let t = TypeBuilder::with_config(TypesConfig {
            max_object_string_bytes: Some(8),
            ..Default::default()
        });
        let schema = t.object_string([("a", t.number(NumberOptions::default()))], ObjectOptions::default());
        assert!(t.decode(&schema, Value::from(r#"{"a":1}"#)).is_ok());
        assert!(t.decode(&schema, Value::from(r#"{"a":12345}"#)).is_err());
    }

    #[test]
    fn test_cookie_directives_do_not_affect_validation() {
        let t = TypeBuilder::new();
        let options = CookieSchemaOptions::new(
            CookieOptions::new().secrets(vec!["new", "old"]).sign(["session"]),
            ObjectOptions::default(),
        );
        let schema = t.cookie([("session", t.string(StringOptions::default()))], options);

        assert!(t.check(&schema, &Value::object([("session", "abc")])));
        assert!(!t.check(&schema, &Value::object([("session", 1)])));

        let cookie = schema.cookie_options().unwrap();
        assert_eq!(cookie.secrets, Some(Secrets::Many(vec!["new".into(), "old".into()])));
        assert!(cookie.requires_signature("session"));
    }

    #[test]
    fn test_global_builder_is_shared() {
        assert!(std::ptr::eq(t(), t()));
        assert!(FormatRegistry::global().has("numeric"));
        assert!(TypeRegistry::global().has(file::FILE_KIND));
    }
}
