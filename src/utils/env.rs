use std::fmt::Display;
use std::str::FromStr;

/// Read `TIDEWAY_{key}`, falling back to `{key}`
///
/// ```rust
/// use tideway_types::utils::get_env_with_prefix;
///
/// // TIDEWAY_TYPES_DATE_ORDER first, then TYPES_DATE_ORDER
/// let order = get_env_with_prefix("TYPES_DATE_ORDER");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("TIDEWAY_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

/// Read and parse a prefixed variable
///
/// A value that does not parse is logged and treated as unset.
pub fn parse_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = get_env_with_prefix(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring unparseable environment variable");
            None
        }
    }
}
