//! Turning raw request input into [`Value`]s.
//!
//! Query strings, urlencoded bodies and multipart bodies are read into
//! objects of strings and files, the wire form the coercing types decode.
//! A name that appears more than once collects into an array.

pub mod form;
pub mod query;

#[cfg(feature = "multipart")]
pub use form::read_multipart;
pub use form::parse_form;
pub use query::parse_query;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::schema::Value;

fn insert_repeated(map: &mut BTreeMap<String, Value>, name: String, value: Value) {
    match map.entry(name) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Array(values) => values.push(value),
            existing => {
                let first = std::mem::take(existing);
                *existing = Value::Array(vec![first, value]);
            }
        },
    }
}
