//! Structural checking of values against schema trees.

use regex::Regex;
use serde::Serialize;

use super::{Schema, SchemaKind, Value};
use super::options::{ArrayOptions, DateOptions, NumberOptions, ObjectOptions, StringOptions};
use crate::error::ValidationError;
use crate::registry::{FormatRegistry, TypeRegistry};

static UNDEFINED: Value = Value::Undefined;

/// One reason a value failed a schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// JSON-pointer style path to the offending value, `""` for the root
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Checks values against schemas, resolving formats and custom kinds
/// through the given registries
#[derive(Debug, Clone, Copy)]
pub struct Checker<'a> {
    formats: &'a FormatRegistry,
    kinds: &'a TypeRegistry,
}

/// Collects issues, or stops at the first one when only a verdict is needed
struct Report {
    collect: bool,
    issues: Vec<Issue>,
}

impl Report {
    fn fail(&mut self, path: &str, message: impl Into<String>) -> bool {
        if self.collect {
            self.issues.push(Issue::new(path, message));
        }
        false
    }
}

impl<'a> Checker<'a> {
    pub fn new(formats: &'a FormatRegistry, kinds: &'a TypeRegistry) -> Self {
        Self { formats, kinds }
    }

    pub fn formats(&self) -> &'a FormatRegistry {
        self.formats
    }

    pub fn kinds(&self) -> &'a TypeRegistry {
        self.kinds
    }

    pub fn check(&self, schema: &Schema, value: &Value) -> bool {
        let mut report = Report {
            collect: false,
            issues: Vec::new(),
        };
        self.visit(schema, value, "", &mut report)
    }

    /// Every issue found, empty when the value is valid
    pub fn errors(&self, schema: &Schema, value: &Value) -> Vec<Issue> {
        let mut report = Report {
            collect: true,
            issues: Vec::new(),
        };
        self.visit(schema, value, "", &mut report);
        report.issues
    }

    /// Return `value` unchanged if it satisfies `schema`
    pub fn validate(&self, schema: &Schema, value: Value) -> Result<Value, ValidationError> {
        let issues = self.errors(schema, &value);
        match issues.first() {
            None => Ok(value),
            Some(first) => Err(violation(schema, &value, &first.path).with_issues(issues)),
        }
    }

    fn visit(&self, schema: &Schema, value: &Value, path: &str, report: &mut Report) -> bool {
        match &schema.kind {
            SchemaKind::Any => true,
            SchemaKind::Null => value.is_null() || report.fail(path, "Expected null"),
            SchemaKind::Undefined => value.is_undefined() || report.fail(path, "Expected undefined"),
            SchemaKind::Boolean => {
                matches!(value, Value::Bool(_)) || report.fail(path, "Expected boolean")
            }
            SchemaKind::String(options) => match value {
                Value::String(s) => self.visit_string(options, s, path, report),
                _ => report.fail(path, "Expected string"),
            },
            SchemaKind::Number(options) => match value {
                Value::Number(n) if !n.is_nan() => visit_number(options, *n, path, report),
                _ => report.fail(path, "Expected number"),
            },
            SchemaKind::Integer(options) => match value {
                Value::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                    visit_number(options, *n, path, report)
                }
                _ => report.fail(path, "Expected integer"),
            },
            SchemaKind::Date(options) => match value {
                Value::Date(d) => visit_date(options, d.timestamp_millis(), path, report),
                _ => report.fail(path, "Expected date"),
            },
            SchemaKind::Literal(expected) => {
                *value == Value::from(expected.clone())
                    || report.fail(path, format!("Expected {}", expected))
            }
            SchemaKind::Object {
                properties,
                options,
            } => match value {
                Value::Object(map) => self.visit_object(properties, options, map, path, report),
                _ => report.fail(path, "Expected object"),
            },
            SchemaKind::Array { items, options } => match value {
                Value::Array(values) => self.visit_array(items, options, values, path, report),
                _ => report.fail(path, "Expected array"),
            },
            SchemaKind::Union(variants) => {
                variants.iter().any(|variant| self.check(variant, value))
                    || report.fail(path, "Expected union value")
            }
            SchemaKind::Custom { kind, options } => match self.kinds.check(kind, options, value) {
                Some(true) => true,
                Some(false) => report.fail(path, format!("Expected kind '{}'", kind)),
                None => {
                    tracing::warn!(kind = %kind, "Unknown schema kind, rejecting value");
                    report.fail(path, format!("Unknown kind '{}'", kind))
                }
            },
        }
    }

    fn visit_string(&self, options: &StringOptions, s: &str, path: &str, report: &mut Report) -> bool {
        let length = s.chars().count();
        if let Some(min) = options.min_length {
            if length < min {
                return report.fail(path, format!("Expected string length greater or equal to {}", min));
            }
        }
        if let Some(max) = options.max_length {
            if length > max {
                return report.fail(path, format!("Expected string length less or equal to {}", max));
            }
        }
        if let Some(pattern) = &options.pattern {
            match Regex::new(pattern) {
                Ok(regex) if regex.is_match(s) => {}
                Ok(_) => return report.fail(path, format!("Expected string to match '{}'", pattern)),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "Invalid string pattern");
                    return report.fail(path, format!("Invalid pattern '{}'", pattern));
                }
            }
        }
        if let Some(format) = &options.format {
            match self.formats.check(format, s) {
                Some(true) => {}
                Some(false) => {
                    return report.fail(path, format!("Expected string to match '{}' format", format));
                }
                None => {
                    tracing::warn!(format = %format, "Unknown string format, rejecting value");
                    return report.fail(path, format!("Unknown format '{}'", format));
                }
            }
        }
        true
    }

    fn visit_object(
        &self,
        properties: &std::collections::BTreeMap<String, Schema>,
        options: &ObjectOptions,
        map: &std::collections::BTreeMap<String, Value>,
        path: &str,
        report: &mut Report,
    ) -> bool {
        let mut ok = true;

        for (key, property) in properties {
            let child = map.get(key).unwrap_or(&UNDEFINED);
            let child_path = format!("{}/{}", path, escape_pointer(key));
            let passed = if child.is_undefined() && !property.accepts_undefined() {
                report.fail(&child_path, "Expected required property")
            } else {
                self.visit(property, child, &child_path, report)
            };
            if !passed {
                ok = false;
                if !report.collect {
                    return false;
                }
            }
        }

        if options.additional_properties == Some(false) {
            for key in map.keys().filter(|k| !properties.contains_key(*k)) {
                report.fail(&format!("{}/{}", path, escape_pointer(key)), "Unexpected property");
                if !report.collect {
                    return false;
                }
                ok = false;
            }
        }

        let count = map.values().filter(|v| !v.is_undefined()).count();
        if options.min_properties.is_some_and(|min| count < min) {
            ok = report.fail(path, "Expected more properties");
        }
        if options.max_properties.is_some_and(|max| count > max) {
            ok = report.fail(path, "Expected fewer properties");
        }
        ok
    }

    fn visit_array(
        &self,
        items: &Schema,
        options: &ArrayOptions,
        values: &[Value],
        path: &str,
        report: &mut Report,
    ) -> bool {
        if let Some(min) = options.min_items {
            if values.len() < min {
                return report.fail(path, format!("Expected array length to be greater or equal to {}", min));
            }
        }
        if let Some(max) = options.max_items {
            if values.len() > max {
                return report.fail(path, format!("Expected array length to be less or equal to {}", max));
            }
        }
        if options.unique_items == Some(true) {
            let duplicate = values
                .iter()
                .enumerate()
                .any(|(i, a)| values[i + 1..].iter().any(|b| a == b));
            if duplicate {
                return report.fail(path, "Expected array elements to be unique");
            }
        }

        let mut ok = true;
        for (index, item) in values.iter().enumerate() {
            if !self.visit(items, item, &format!("{}/{}", path, index), report) {
                ok = false;
                if !report.collect {
                    return false;
                }
            }
        }
        ok
    }
}

fn visit_number(options: &NumberOptions, n: f64, path: &str, report: &mut Report) -> bool {
    if let Some(min) = options.minimum.filter(|min| n < *min) {
        return report.fail(path, format!("Expected number to be greater or equal to {}", min));
    }
    if let Some(max) = options.maximum.filter(|max| n > *max) {
        return report.fail(path, format!("Expected number to be less or equal to {}", max));
    }
    if options.exclusive_minimum.is_some_and(|min| n <= min) {
        return report.fail(path, "Expected number to be greater than exclusive minimum");
    }
    if options.exclusive_maximum.is_some_and(|max| n >= max) {
        return report.fail(path, "Expected number to be less than exclusive maximum");
    }
    if options.multiple_of.is_some_and(|step| step != 0.0 && (n / step).fract() != 0.0) {
        return report.fail(path, "Expected number to be a multiple of the given step");
    }
    true
}

fn visit_date(options: &DateOptions, millis: i64, path: &str, report: &mut Report) -> bool {
    if options.minimum_timestamp.is_some_and(|min| millis < min) {
        return report.fail(path, "Expected date to be at or after the minimum timestamp");
    }
    if options.maximum_timestamp.is_some_and(|max| millis > max) {
        return report.fail(path, "Expected date to be at or before the maximum timestamp");
    }
    if options.exclusive_minimum_timestamp.is_some_and(|min| millis <= min) {
        return report.fail(path, "Expected date to be after the exclusive minimum timestamp");
    }
    if options.exclusive_maximum_timestamp.is_some_and(|max| millis >= max) {
        return report.fail(path, "Expected date to be before the exclusive maximum timestamp");
    }
    true
}

fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn unescape_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// The schema node at `path` and the value found there
///
/// The walk stops at the first node that is not an object or array, so
/// union and custom-kind failures are blamed on the union or kind itself.
/// A node without an `error` option takes the nearest enclosing one.
fn violation(schema: &Schema, value: &Value, path: &str) -> ValidationError {
    let mut enclosing = Vec::new();
    let mut node = schema;
    let mut found = value;

    for segment in path.split('/').skip(1) {
        let key = unescape_pointer(segment);
        let next = match (&node.kind, found) {
            (SchemaKind::Object { properties, .. }, Value::Object(map)) => properties
                .get(&key)
                .map(|property| (property, map.get(&key).unwrap_or(&UNDEFINED))),
            (SchemaKind::Array { items, .. }, Value::Array(values)) => key
                .parse::<usize>()
                .ok()
                .and_then(|index| values.get(index))
                .map(|item| (items.as_ref(), item)),
            _ => None,
        };
        let Some((child, child_value)) = next else {
            break;
        };
        enclosing.push(node);
        node = child;
        found = child_value;
    }

    enclosing
        .into_iter()
        .rev()
        .fold(ValidationError::property(node, found.clone()), |err, outer| {
            err.inherit_error(outer)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{bootstrap, DateOrder};
    use crate::schema::options::StringOptions;
    use chrono::{TimeZone, Utc};

    fn registries() -> (FormatRegistry, TypeRegistry) {
        let formats = FormatRegistry::new();
        bootstrap(&formats, DateOrder::DayFirst);
        (formats, TypeRegistry::new())
    }

    #[test]
    fn test_primitives() {
        let (formats, kinds) = registries();
        let checker = Checker::new(&formats, &kinds);

        assert!(checker.check(&Schema::boolean(), &Value::Bool(true)));
        assert!(!checker.check(&Schema::boolean(), &Value::from("true")));
        assert!(checker.check(&Schema::null(), &Value::Null));
        assert!(!checker.check(&Schema::null(), &Value::Undefined));
        assert!(!checker.check(&Schema::number(NumberOptions::default()), &Value::Number(f64::NAN)));
        assert!(!checker.check(&Schema::integer(NumberOptions::default()), &Value::Number(1.5)));
    }

    #[test]
    fn test_number_constraints() {
        let (formats, kinds) = registries();
        let checker = Checker::new(&formats, &kinds);
        let schema = Schema::number(NumberOptions {
            multiple_of: Some(5.0),
            ..NumberOptions::range(0.0, 100.0)
        });

        assert!(checker.check(&schema, &Value::from(25)));
        assert!(!checker.check(&schema, &Value::from(101)));
        assert!(!checker.check(&schema, &Value::from(-5)));
        assert!(!checker.check(&schema, &Value::from(12)));
    }

    #[test]
    fn test_string_format_and_length() {
        let (formats, kinds) = registries();
        let checker = Checker::new(&formats, &kinds);
        let schema = Schema::string(StringOptions {
            max_length: Some(3),
            ..StringOptions::format("numeric")
        });

        assert!(checker.check(&schema, &Value::from("123")));
        assert!(!checker.check(&schema, &Value::from("1234")));
        assert!(!checker.check(&schema, &Value::from("abc")));
    }

    #[test]
    fn test_unknown_format_fails() {
        let (formats, kinds) = registries();
        let checker = Checker::new(&formats, &kinds);
        let schema = Schema::string(StringOptions::format("not-registered"));

        let issues = checker.errors(&schema, &Value::from("x"));
        assert_eq!(issues, vec![Issue::new("", "Unknown format 'not-registered'")]);
    }

    #[test]
    fn test_object_required_and_paths() {
        let (formats, kinds) = registries();
        let checker = Checker::new(&formats, &kinds);
        let schema = Schema::object(
            [
                ("name", Schema::string(StringOptions::default())),
                ("age", Schema::number(NumberOptions::default())),
                ("nick", Schema::union(vec![Schema::string(StringOptions::default()), Schema::undefined()])),
            ],
            ObjectOptions::strict(),
        );

        let value = Value::object([("age", Value::from("old")), ("extra", Value::from(1))]);
        let issues = checker.errors(&schema, &value);
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["/age", "/name", "/extra"]);

        let valid = Value::object([("name", "Ada"), ("age", "36")]);
        assert!(!checker.check(&schema, &valid));
        let valid = Value::object([("name", Value::from("Ada")), ("age", Value::from(36))]);
        assert!(checker.check(&schema, &valid));
    }

    #[test]
    fn test_array_constraints() {
        let (formats, kinds) = registries();
        let checker = Checker::new(&formats, &kinds);
        let schema = Schema::array(
            Schema::number(NumberOptions::default()),
            ArrayOptions {
                max_items: Some(2),
                unique_items: Some(true),
                ..Default::default()
            },
        );

        assert!(checker.check(&schema, &Value::Array(vec![1.into(), 2.into()])));
        assert!(!checker.check(&schema, &Value::Array(vec![1.into(), 1.into()])));
        assert!(!checker.check(&schema, &Value::Array(vec![1.into(), 2.into(), 3.into()])));
    }

    #[test]
    fn test_date_bounds() {
        let (formats, kinds) = registries();
        let checker = Checker::new(&formats, &kinds);
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let schema = Schema::date(DateOptions {
            minimum_timestamp: Some(start.timestamp_millis()),
            ..Default::default()
        });

        assert!(checker.check(&schema, &Value::Date(start)));
        assert!(!checker.check(&schema, &Value::Date(Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap())));
    }

    #[test]
    fn test_validate_blames_the_failing_property() {
        let (formats, kinds) = registries();
        let checker = Checker::new(&formats, &kinds);
        let schema = Schema::object(
            [
                ("name", Schema::string(StringOptions::default())),
                (
                    "tags",
                    Schema::array(
                        Schema::number(NumberOptions::default()).with_error("tags are numbers"),
                        ArrayOptions::default(),
                    ),
                ),
            ],
            ObjectOptions::default(),
        );

        let value = Value::object([
            ("name", Value::from("Ada")),
            ("tags", Value::Array(vec![1.into(), "two".into()])),
        ]);
        let err = checker.validate(&schema, value).unwrap_err();
        assert_eq!(err.schema.kind_name(), "number");
        assert_eq!(err.value, Value::from("two"));
        assert_eq!(err.issues[0].path, "/tags/1");
        assert_eq!(err.body(), serde_json::json!({"error": "tags are numbers"}));
    }

    #[test]
    fn test_validate_falls_back_to_enclosing_error() {
        let (formats, kinds) = registries();
        let checker = Checker::new(&formats, &kinds);
        let schema = Schema::object(
            [("a/b", Schema::boolean())],
            ObjectOptions::default(),
        )
        .with_error("bad flags");

        let err = checker
            .validate(&schema, Value::object([("a/b", 1)]))
            .unwrap_err();
        assert_eq!(err.issues[0].path, "/a~1b");
        assert_eq!(err.schema.kind_name(), "boolean");
        assert_eq!(err.body(), serde_json::json!({"error": "bad flags"}));
    }

    #[test]
    fn test_unknown_custom_kind_fails() {
        let (formats, kinds) = registries();
        let checker = Checker::new(&formats, &kinds);
        assert!(!checker.check(&Schema::custom("Mystery", serde_json::Value::Null), &Value::Null));
    }
}
