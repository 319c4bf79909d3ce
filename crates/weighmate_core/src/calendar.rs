//! Calendar utilities for challenge dates.
//!
//! # Responsibility
//! - Parse and format zero-padded `YYYY-MM-DD` strings.
//! - Compute the default weigh-in date (next Monday) and the yearly
//!   submission deadline.
//!
//! # Invariants
//! - All dates are local calendar dates (`chrono::NaiveDate`); chronological
//!   order is the type's total order, never string comparison.
//! - Formatting always zero-pads, so persisted dates sort the same way
//!   lexically and chronologically.

use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static STRICT_ISO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Day-of-month of the submission cutoff.
const DEADLINE_DAY: u32 = 10;
/// Month of the submission cutoff (December).
const DEADLINE_MONTH: u32 = 12;

pub type DateResult<T> = Result<T, DateParseError>;

/// Error for calendar-date parsing at input and storage boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// Input is empty or a component is not a number.
    Malformed(String),
    /// Components parsed but do not name a real calendar date.
    OutOfRange { year: i32, month: u32, day: u32 },
    /// Strict parsing requires the zero-padded 10-char `YYYY-MM-DD` shape.
    NotZeroPadded(String),
}

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(input) => write!(f, "malformed calendar date `{input}`"),
            Self::OutOfRange { year, month, day } => {
                write!(f, "no such calendar date: {year:04}-{month:02}-{day:02}")
            }
            Self::NotZeroPadded(input) => {
                write!(f, "expected zero-padded YYYY-MM-DD, got `{input}`")
            }
        }
    }
}

impl Error for DateParseError {}

/// Parses a `YYYY-MM-DD` string as a local calendar date.
///
/// Missing month/day components default to 1. The fallback exists for
/// defensive handling of truncated input; well-formed callers always pass
/// all three components.
pub fn parse_date_iso(input: &str) -> DateResult<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Malformed(input.to_string()));
    }

    let mut components = trimmed.splitn(3, '-');
    let year = parse_component(components.next(), input)?
        .ok_or_else(|| DateParseError::Malformed(input.to_string()))?;
    let month = parse_component(components.next(), input)?.unwrap_or(1);
    let day = parse_component(components.next(), input)?.unwrap_or(1);

    NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or(DateParseError::OutOfRange {
        year,
        month: month as u32,
        day: day as u32,
    })
}

/// Parses a date requiring the exact zero-padded `YYYY-MM-DD` shape.
///
/// Used at the storage boundary: persisted dates that lost their padding
/// would break lexical ordering in the store, so they are rejected instead
/// of silently normalized.
pub fn parse_date_iso_strict(input: &str) -> DateResult<NaiveDate> {
    if !STRICT_ISO_RE.is_match(input) {
        return Err(DateParseError::NotZeroPadded(input.to_string()));
    }
    parse_date_iso(input)
}

/// Formats a date as zero-padded `YYYY-MM-DD`.
pub fn format_date_iso(date: NaiveDate) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Returns today's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Returns the next Monday on or after `from`.
///
/// Identity when `from` is already a Monday. Weigh-ins default to this date.
pub fn next_monday(from: NaiveDate) -> NaiveDate {
    let offset = (7 - from.weekday().num_days_from_monday()) % 7;
    from.checked_add_days(Days::new(u64::from(offset)))
        .unwrap_or(from)
}

/// Returns the submission cutoff (December 10) for the given year.
pub fn submission_deadline(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, DEADLINE_MONTH, DEADLINE_DAY).expect("valid deadline date")
}

/// Returns the submission cutoff for `today`'s year.
pub fn submission_deadline_for(today: NaiveDate) -> NaiveDate {
    submission_deadline(today.year())
}

/// True when `date` falls strictly after the cutoff.
///
/// The cutoff date itself is still accepted for submissions.
pub fn is_past_deadline(date: NaiveDate, deadline: NaiveDate) -> bool {
    date > deadline
}

/// Whole days remaining until the deadline, clamped at zero.
pub fn days_left(today: NaiveDate, deadline: NaiveDate) -> i64 {
    (deadline - today).num_days().max(0)
}

fn parse_component(component: Option<&str>, input: &str) -> DateResult<Option<i32>> {
    match component {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw
            .parse::<i32>()
            .map(Some)
            .map_err(|_| DateParseError::Malformed(input.to_string())),
    }
}
