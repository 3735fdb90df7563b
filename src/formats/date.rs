//! Date grammars accepted from request data, and the parser that turns them
//! into instants.
//!
//! Three grammars are recognised on top of the baseline `date` and
//! `date-time` formats:
//!
//! - ISO-8601 with a time and a `Z` or numeric offset
//! - the verbose form browsers print, `Tue Mar 05 2024 14:30:00 GMT+0100 (CET)`
//! - short `D/M/Y` or `Y/M/D` dates with an optional `HH:MM[:SS]` time
//!
//! Matching a grammar is never enough: the value must also parse to a
//! calendar-valid instant, so `2024-02-30` and day 32 are rejected.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

use super::full;

/// How the first two fields of an `a/b/YYYY` date are read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// `25/12/2024`
    #[default]
    DayFirst,
    /// `12/25/2024`
    MonthFirst,
}

impl FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day-first" | "dmy" => Ok(Self::DayFirst),
            "month-first" | "mdy" => Ok(Self::MonthFirst),
            other => Err(format!(
                "unknown date order '{}', expected 'day-first' or 'month-first'",
                other
            )),
        }
    }
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

static ISO_WITH_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}(?::[0-9]{2}(?:\.[0-9]+)?)?(?:Z|[+-][0-9]{2}:?[0-9]{2})$",
    )
    .expect("ISO date regex is valid")
});

static ISO_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{4})-([0-9]{2})-([0-9]{2})(?:[Tt ]([0-9]{2}):([0-9]{2})(?::([0-9]{2})(?:\.([0-9]{1,9})[0-9]*)?)?)?\s*(Z|z|[+-][0-9]{2}(?::?[0-9]{2})?)?$",
    )
    .expect("ISO parts regex is valid")
});

static VERBOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:Sun|Mon|Tue|Wed|Thu|Fri|Sat) (Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) ([0-9]{1,2}) ([0-9]{4}) ([0-9]{2}):([0-9]{2}):([0-9]{2}) GMT([+-][0-9]{4})(?: \([^)]*\))?$",
    )
    .expect("verbose date regex is valid")
});

static SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{1,4})/([0-9]{1,2})/([0-9]{1,4})(?:,?\s+([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?(?:\s?([AaPp][Mm]))?)?$",
    )
    .expect("short date regex is valid")
});

/// `date` format predicate
pub fn is_date(value: &str, order: DateOrder) -> bool {
    matches_date(value, order, full::is_date)
}

/// `date-time` format predicate
pub fn is_date_time(value: &str, order: DateOrder) -> bool {
    matches_date(value, order, full::is_date_time)
}

fn matches_date(value: &str, order: DateOrder, baseline: fn(&str) -> bool) -> bool {
    let stripped = value.replace('"', "");
    let shaped = ISO_WITH_OFFSET.is_match(&stripped)
        || VERBOSE.is_match(&stripped)
        || is_short_date(&stripped)
        || baseline(&stripped);

    shaped && parse_date(&stripped, order).is_some()
}

fn is_short_date(value: &str) -> bool {
    SHORT.captures(value).is_some_and(|caps| {
        let first = caps.get(1).map_or(0, |m| m.len());
        let last = caps.get(3).map_or(0, |m| m.len());
        (first == 4 && last <= 2) || (first <= 2 && last == 4)
    })
}

/// Parse a date the way a browser's `new Date(string)` would accept it
///
/// Double quotes are stripped first. A missing offset means UTC. Returns
/// `None` for anything unrecognised or calendar-invalid.
pub fn parse_date(value: &str, order: DateOrder) -> Option<DateTime<Utc>> {
    let cleaned = value.replace('"', "");
    let s = cleaned.trim();
    if s.is_empty() {
        return None;
    }

    parse_iso(s)
        .or_else(|| DateTime::parse_from_rfc2822(s).ok().map(|d| d.with_timezone(&Utc)))
        .or_else(|| parse_verbose(s))
        .or_else(|| parse_short(s, order))
}

fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    let caps = ISO_PARTS.captures(s)?;
    let field = |i: usize| caps.get(i).map(|m| m.as_str());
    let number = |i: usize| field(i).and_then(|v| v.parse::<u32>().ok());

    let date = NaiveDate::from_ymd_opt(field(1)?.parse().ok()?, number(2)?, number(3)?)?;
    let nanos = field(7).map_or(Some(0), fraction_to_nanos)?;
    let naive = date.and_hms_nano_opt(
        number(4).unwrap_or(0),
        number(5).unwrap_or(0),
        number(6).unwrap_or(0),
        nanos,
    )?;

    let offset = match field(8) {
        Some(raw) => parse_offset(raw)?,
        None => FixedOffset::east_opt(0)?,
    };
    to_utc(naive, offset)
}

fn parse_verbose(s: &str) -> Option<DateTime<Utc>> {
    let caps = VERBOSE.captures(s)?;
    let field = |i: usize| caps.get(i).map(|m| m.as_str());
    let number = |i: usize| field(i).and_then(|v| v.parse::<u32>().ok());

    let month = MONTHS.iter().position(|m| Some(*m) == field(1))? as u32 + 1;
    let date = NaiveDate::from_ymd_opt(field(3)?.parse().ok()?, month, number(2)?)?;
    let naive = date.and_hms_opt(number(4)?, number(5)?, number(6)?)?;
    to_utc(naive, parse_offset(field(7)?)?)
}

fn parse_short(s: &str, order: DateOrder) -> Option<DateTime<Utc>> {
    let caps = SHORT.captures(s)?;
    let field = |i: usize| caps.get(i).map(|m| m.as_str());
    let number = |i: usize| field(i).and_then(|v| v.parse::<u32>().ok());

    let (first, second, third) = (field(1)?, number(2)?, field(3)?);
    let (year, month, day) = if first.len() == 4 && third.len() <= 2 {
        (first.parse::<i32>().ok()?, second, third.parse::<u32>().ok()?)
    } else if first.len() <= 2 && third.len() == 4 {
        let first = first.parse::<u32>().ok()?;
        let year = third.parse::<i32>().ok()?;
        match order {
            DateOrder::DayFirst => (year, second, first),
            DateOrder::MonthFirst => (year, first, second),
        }
    } else {
        return None;
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let mut hour = number(4).unwrap_or(0);
    if let Some(meridiem) = field(7) {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = meridiem.eq_ignore_ascii_case("pm");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }
    let naive = date.and_hms_opt(hour, number(5).unwrap_or(0), number(6).unwrap_or(0))?;
    Some(Utc.from_utc_datetime(&naive))
}

fn fraction_to_nanos(digits: &str) -> Option<u32> {
    format!("{:0<9}", digits).parse().ok()
}

/// `Z`, `+hh`, `+hhmm` or `+hh:mm`
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn to_utc(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_iso_variants() {
        let order = DateOrder::DayFirst;
        assert_eq!(parse_date("2024-03-05T14:30:00Z", order), Some(utc(2024, 3, 5, 14, 30, 0)));
        assert_eq!(parse_date("2024-03-05T15:30:00+01:00", order), Some(utc(2024, 3, 5, 14, 30, 0)));
        assert_eq!(parse_date("2024-03-05T15:30:00+0100", order), Some(utc(2024, 3, 5, 14, 30, 0)));
        assert_eq!(parse_date("2024-03-05", order), Some(utc(2024, 3, 5, 0, 0, 0)));
        assert_eq!(parse_date("2024-03-05T14:30", order), Some(utc(2024, 3, 5, 14, 30, 0)));
        assert_eq!(
            parse_date("2024-03-05T14:30:00.250Z", order).map(|d| d.timestamp_millis()),
            Some(utc(2024, 3, 5, 14, 30, 0).timestamp_millis() + 250)
        );
    }

    #[test]
    fn test_parse_strips_quotes() {
        assert_eq!(
            parse_date("\"2024-03-05T14:30:00Z\"", DateOrder::DayFirst),
            Some(utc(2024, 3, 5, 14, 30, 0))
        );
    }

    #[test]
    fn test_parse_verbose_form() {
        assert_eq!(
            parse_date(
                "Tue Mar 05 2024 15:30:00 GMT+0100 (Central European Standard Time)",
                DateOrder::DayFirst
            ),
            Some(utc(2024, 3, 5, 14, 30, 0))
        );
    }

    #[test]
    fn test_parse_rfc2822() {
        assert_eq!(
            parse_date("Tue, 05 Mar 2024 14:30:00 +0000", DateOrder::DayFirst),
            Some(utc(2024, 3, 5, 14, 30, 0))
        );
    }

    #[test]
    fn test_parse_short_forms() {
        assert_eq!(parse_date("25/12/2024", DateOrder::DayFirst), Some(utc(2024, 12, 25, 0, 0, 0)));
        assert_eq!(parse_date("12/25/2024", DateOrder::MonthFirst), Some(utc(2024, 12, 25, 0, 0, 0)));
        assert_eq!(parse_date("2024/12/25", DateOrder::MonthFirst), Some(utc(2024, 12, 25, 0, 0, 0)));
        assert_eq!(
            parse_date("25/12/2024 9:05:30", DateOrder::DayFirst),
            Some(utc(2024, 12, 25, 9, 5, 30))
        );
        assert_eq!(
            parse_date("25/12/2024, 9:05 PM", DateOrder::DayFirst),
            Some(utc(2024, 12, 25, 21, 5, 0))
        );
        assert_eq!(parse_date("12/25/2024", DateOrder::DayFirst), None);
    }

    #[test]
    fn test_calendar_invalid_dates_rejected() {
        let order = DateOrder::DayFirst;
        assert_eq!(parse_date("2024-02-30", order), None);
        assert_eq!(parse_date("2024-01-32T00:00:00Z", order), None);
        assert_eq!(parse_date("32/01/2024", order), None);
        assert_eq!(parse_date("2024-13-01T00:00:00Z", order), None);
        assert_eq!(parse_date("not a date", order), None);
        assert_eq!(parse_date("", order), None);
    }

    #[test]
    fn test_date_format_requires_valid_instant() {
        let order = DateOrder::DayFirst;
        assert!(is_date("2024-02-29", order));
        assert!(is_date("2024-03-05T14:30:00Z", order));
        assert!(is_date("Tue Mar 05 2024 15:30:00 GMT+0100 (CET)", order));
        assert!(is_date("05/03/2024", order));
        assert!(!is_date("2024-02-30", order));
        assert!(!is_date("2023-02-29", order));
        assert!(!is_date("2024-01-32T00:00:00Z", order));
        assert!(!is_date("tomorrow", order));
    }

    #[test]
    fn test_date_time_format() {
        let order = DateOrder::DayFirst;
        assert!(is_date_time("2024-03-05T14:30:00Z", order));
        assert!(is_date_time("2024-03-05 14:30:00+02:00", order));
        assert!(!is_date_time("2024-02-30T10:00:00Z", order));
    }

    #[test]
    fn test_iso_offset_without_seconds() {
        let order = DateOrder::DayFirst;
        for value in ["2024-03-05T14:30Z", "2024-03-05T15:30+01:00", "2024-03-05T15:30+0100"] {
            assert!(is_date(value, order), "{}", value);
            assert!(is_date_time(value, order), "{}", value);
            assert_eq!(parse_date(value, order), Some(utc(2024, 3, 5, 14, 30, 0)));
        }
        assert!(!is_date("2024-03-05T25:30Z", order));
    }

    #[test]
    fn test_date_order_from_str() {
        assert_eq!("day-first".parse::<DateOrder>(), Ok(DateOrder::DayFirst));
        assert_eq!("MDY".parse::<DateOrder>(), Ok(DateOrder::MonthFirst));
        assert!("sideways".parse::<DateOrder>().is_err());
    }
}
