//! String formats used by the coercing types, and the bootstrap that
//! registers them.
//!
//! # Example
//!
//! ```rust
//! use tideway_types::formats::{bootstrap, DateOrder};
//! use tideway_types::registry::FormatRegistry;
//!
//! let registry = FormatRegistry::new();
//! bootstrap(&registry, DateOrder::DayFirst);
//!
//! assert_eq!(registry.check("numeric", "42"), Some(true));
//! assert_eq!(registry.check("boolean", "yes"), Some(false));
//! ```

pub mod date;
pub mod full;
pub mod strings;

pub use date::{DateOrder, parse_date};
pub use full::{FULL_FORMATS, FormatRule};
pub use strings::{is_boolean_string, is_numeric, is_object_string, to_number};

use regex::Regex;
use std::sync::Arc;

use crate::registry::{FormatPredicate, FormatRegistry};

pub const DATE: &str = "date";
pub const DATE_TIME: &str = "date-time";
pub const NUMERIC: &str = "numeric";
pub const BOOLEAN: &str = "boolean";
pub const OBJECT_STRING: &str = "ObjectString";

/// Register every format this crate relies on, skipping names that already
/// have a predicate
///
/// Safe to call any number of times, and safe when another component has
/// registered some of the same names first: existing predicates are never
/// replaced. Returns how many names this call registered.
pub fn bootstrap(registry: &FormatRegistry, order: DateOrder) -> usize {
    let mut added = 0;
    let mut register = |name: &str, predicate: FormatPredicate| {
        if registry.set_if_absent(name, predicate) {
            added += 1;
        }
    };

    register(DATE, Arc::new(move |value: &str| date::is_date(value, order)));
    register(DATE_TIME, Arc::new(move |value: &str| date::is_date_time(value, order)));

    for (name, rule) in FULL_FORMATS {
        if registry.has(name) {
            continue;
        }
        match rule_predicate(*rule) {
            Some(predicate) => register(name, predicate),
            None => tracing::error!(format = %name, "Skipping format with an invalid pattern"),
        }
    }

    register(NUMERIC, Arc::new(is_numeric));
    register(BOOLEAN, Arc::new(is_boolean_string));
    register(OBJECT_STRING, Arc::new(is_object_string));

    tracing::debug!(added, total = registry.len(), "String formats bootstrapped");
    added
}

fn rule_predicate(rule: FormatRule) -> Option<FormatPredicate> {
    match rule {
        FormatRule::Pattern(pattern) => {
            let regex = Regex::new(pattern).ok()?;
            Some(Arc::new(move |value: &str| regex.is_match(value)))
        }
        FormatRule::Predicate(predicate) => Some(Arc::new(predicate)),
    }
}
