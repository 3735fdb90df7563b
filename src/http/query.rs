//! Query strings.

use std::collections::BTreeMap;

use super::insert_repeated;
use crate::error::Result;
use crate::schema::Value;

/// Parse a query string into an object of strings
///
/// A leading `?` is ignored. Names given more than once, as in
/// `?tag=a&tag=b`, become arrays.
///
/// ```rust
/// use tideway_types::{Value, http::parse_query};
///
/// let query = parse_query("?page=2&tag=a&tag=b").unwrap();
/// assert_eq!(query.get("page"), Some(&Value::from("2")));
/// assert_eq!(query.get("tag"), Some(&Value::Array(vec!["a".into(), "b".into()])));
/// ```
pub fn parse_query(raw: &str) -> Result<Value> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)?;

    let mut object = BTreeMap::new();
    for (name, value) in pairs {
        insert_repeated(&mut object, name, Value::String(value));
    }
    Ok(Value::Object(object))
}
