//! The standard JSON Schema string formats.
//!
//! Each entry is either a regular expression or a predicate function. The
//! bootstrap registers every entry the same way, wrapping patterns into
//! predicates.

use chrono::NaiveDate;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;
use url::Url;

use super::strings::to_number;

/// How a format is decided
#[derive(Debug, Clone, Copy)]
pub enum FormatRule {
    /// The whole string must match the expression
    Pattern(&'static str),
    Predicate(fn(&str) -> bool),
}

pub static FULL_FORMATS: &[(&str, FormatRule)] = &[
    ("date", FormatRule::Predicate(is_date)),
    ("time", FormatRule::Predicate(is_time)),
    ("date-time", FormatRule::Predicate(is_date_time)),
    ("duration", FormatRule::Predicate(is_duration)),
    ("uri", FormatRule::Predicate(is_uri)),
    ("uri-reference", FormatRule::Predicate(is_uri_reference)),
    ("url", FormatRule::Predicate(is_url)),
    (
        "email",
        FormatRule::Pattern(
            r"^(?i)[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$",
        ),
    ),
    ("hostname", FormatRule::Predicate(is_hostname)),
    ("ipv4", FormatRule::Predicate(is_ipv4)),
    ("ipv6", FormatRule::Predicate(is_ipv6)),
    ("regex", FormatRule::Predicate(is_regex)),
    ("uuid", FormatRule::Predicate(is_uuid)),
    ("json-pointer", FormatRule::Pattern(r"^(?:/(?:[^~/]|~0|~1)*)*$")),
    (
        "json-pointer-uri-fragment",
        FormatRule::Pattern(r"^(?i)#(?:/(?:[a-z0-9_\-.!$&'()*+,;:=@]|%[0-9a-f]{2}|~0|~1)*)*$"),
    ),
    (
        "relative-json-pointer",
        FormatRule::Pattern(r"^(?:0|[1-9][0-9]*)(?:#|(?:/(?:[^~/]|~0|~1)*)*)$"),
    ),
    (
        "byte",
        FormatRule::Pattern(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$"),
    ),
    ("int32", FormatRule::Predicate(is_int32)),
    ("int64", FormatRule::Predicate(is_int64)),
    ("float", FormatRule::Predicate(is_float)),
    ("double", FormatRule::Predicate(is_float)),
    ("password", FormatRule::Predicate(accept_any)),
    ("binary", FormatRule::Predicate(accept_any)),
];

/// Look up a table entry by name
pub fn rule(name: &str) -> Option<FormatRule> {
    FULL_FORMATS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, rule)| *rule)
}

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("date regex is valid"));

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.[0-9]+)?(z|[+-][0-9]{2}(?::?[0-9]{2})?)?$")
        .expect("time regex is valid")
});

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(?:[0-9]+Y)?(?:[0-9]+M)?(?:[0-9]+D)?(?:T(?:[0-9]+H)?(?:[0-9]+M)?(?:[0-9]+S)?)?|[0-9]+W)$")
        .expect("duration regex is valid")
});

static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)*\.?$")
        .expect("hostname regex is valid")
});

/// `YYYY-MM-DD` with a day that exists in that month
pub fn is_date(value: &str) -> bool {
    let Some(caps) = DATE.captures(value) else {
        return false;
    };
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let (Some(year), Some(month), Some(day)) = (part(1), part(2), part(3)) else {
        return false;
    };
    i32::try_from(year).is_ok_and(|year| NaiveDate::from_ymd_opt(year, month, day).is_some())
}

fn check_time(value: &str, require_zone: bool) -> bool {
    let Some(caps) = TIME.captures(value) else {
        return false;
    };
    if require_zone && caps.get(4).is_none() {
        return false;
    }
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let (Some(hour), Some(minute), Some(second)) = (part(1), part(2), part(3)) else {
        return false;
    };
    // A leap second is only valid as the last second of a minute.
    hour <= 23 && minute <= 59 && (second <= 59 || (second == 60 && minute == 59))
}

/// `HH:MM:SS[.frac][offset]`
pub fn is_time(value: &str) -> bool {
    check_time(value, false)
}

/// RFC 3339 date-time; `T`, `t` or a space separates date and time
pub fn is_date_time(value: &str) -> bool {
    let Some(split) = value.find(['T', 't', ' ']) else {
        return false;
    };
    is_date(&value[..split]) && check_time(&value[split + 1..], true)
}

/// ISO-8601 duration such as `P1DT2H` or `P3W`
pub fn is_duration(value: &str) -> bool {
    DURATION.is_match(value) && value != "P" && !value.ends_with('T')
}

pub fn is_uri(value: &str) -> bool {
    Url::parse(value).is_ok()
}

pub fn is_uri_reference(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    if Url::parse(value).is_ok() {
        return true;
    }
    Url::parse("http://reference.invalid/")
        .and_then(|base| base.join(value))
        .is_ok()
}

pub fn is_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https" | "ftp"))
}

pub fn is_hostname(value: &str) -> bool {
    value.len() <= 253 && HOSTNAME.is_match(value)
}

pub fn is_ipv4(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

pub fn is_ipv6(value: &str) -> bool {
    value.parse::<Ipv6Addr>().is_ok()
}

pub fn is_regex(value: &str) -> bool {
    Regex::new(value).is_ok()
}

/// Hyphenated UUID, optionally prefixed with `urn:uuid:`
pub fn is_uuid(value: &str) -> bool {
    let bare = value.strip_prefix("urn:uuid:").unwrap_or(value);
    bare.len() == 36 && uuid::Uuid::parse_str(bare).is_ok()
}

pub fn is_int32(value: &str) -> bool {
    value.parse::<i32>().is_ok()
}

pub fn is_int64(value: &str) -> bool {
    value.parse::<i64>().is_ok()
}

pub fn is_float(value: &str) -> bool {
    !value.trim().is_empty() && to_number(value).is_some()
}

fn accept_any(_: &str) -> bool {
    true
}
