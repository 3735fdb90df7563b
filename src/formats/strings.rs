//! Sniffers for values that arrive as strings but mean something else.

/// Convert a string to a number the way a browser's `Number()` would
///
/// Surrounding whitespace is ignored, an empty string is `0`, `Infinity`
/// and `0x`/`0o`/`0b` prefixes are understood. Returns `None` where
/// `Number()` would produce `NaN`.
pub fn to_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return u128::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }

    // `f64::from_str` also takes "inf", "nan" and "infinity".
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

/// `numeric` format: a non-blank string that converts to a number
pub fn is_numeric(value: &str) -> bool {
    !value.trim().is_empty() && to_number(value).is_some()
}

/// `boolean` format: exactly `"true"` or `"false"`
pub fn is_boolean_string(value: &str) -> bool {
    value == "true" || value == "false"
}

/// `ObjectString` format: a JSON object or array serialized as a string
///
/// The first significant character is checked before anything is parsed.
pub fn is_object_string(value: &str) -> bool {
    let significant = match value.as_bytes().first() {
        Some(b' ' | b'\t' | b'\n') => value.trim_start(),
        _ => value,
    };

    if !matches!(significant.as_bytes().first(), Some(b'{' | b'[')) {
        return false;
    }

    serde_json::from_str::<serde::de::IgnoredAny>(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_number() {
        assert_eq!(to_number("42"), Some(42.0));
        assert_eq!(to_number(" 3.5 "), Some(3.5));
        assert_eq!(to_number("-1e3"), Some(-1000.0));
        assert_eq!(to_number("0x1F"), Some(31.0));
        assert_eq!(to_number(""), Some(0.0));
        assert_eq!(to_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(to_number("abc"), None);
        assert_eq!(to_number("inf"), None);
        assert_eq!(to_number("NaN"), None);
        assert_eq!(to_number("12px"), None);
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("10"));
        assert!(is_numeric("-0.25"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("   "));
        assert!(!is_numeric("ten"));
    }

    #[test]
    fn test_is_boolean_string() {
        assert!(is_boolean_string("true"));
        assert!(is_boolean_string("false"));
        assert!(!is_boolean_string("TRUE"));
        assert!(!is_boolean_string("1"));
    }

    #[test]
    fn test_is_object_string() {
        assert!(is_object_string(r#"{"a":1}"#));
        assert!(is_object_string("[1,2]"));
        assert!(is_object_string(" \n{\"a\": 1}"));
        assert!(!is_object_string("{bad"));
        assert!(!is_object_string("\"text\""));
        assert!(!is_object_string("42"));
        assert!(!is_object_string(""));
    }
}
