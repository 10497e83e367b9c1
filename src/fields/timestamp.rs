//! Timestamp field
//!
//! Dates in the wild come as `2016-03-11`, `11/03/2016`, `10.11.12`,
//! `11th March 2016` or `20160311`, with or without a time of day. The
//! parser tries the unambiguous formats first, then falls back to
//! tokenizing and assigning day/month/year positions.
//!
//! For ambiguous all-numeric dates the `dayfirst` flag decides between the
//! European (default) and American reading; `yearfirst` handles sources
//! that write two-digit years up front.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::ValidationError;
use crate::field::FieldType;
use crate::value::Value;

/// What a parsed timestamp is returned as
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimestampOutput {
    /// A [`Value::Timestamp`]
    #[default]
    DateTime,
    /// A [`Value::Str`], rendered with this strftime format string
    Format(String),
}

/// Parse and check the various date and time formats
#[derive(Debug, Clone, Default)]
pub struct Timestamp {
    output: TimestampOutput,
    dayfirst: bool,
    yearfirst: bool,
}

impl Timestamp {
    /// New timestamp field with the European `dayfirst` preference and
    /// datetime output
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: TimestampOutput::DateTime,
            dayfirst: true,
            yearfirst: false,
        }
    }

    /// In ambiguous all-numeric dates, read the first component as the day
    /// (true, the default: `10/11/12` is 10 November) or as the month
    /// (false: 11 October)
    #[must_use]
    pub const fn dayfirst(mut self, dayfirst: bool) -> Self {
        self.dayfirst = dayfirst;
        self
    }

    /// In ambiguous all-numeric dates with short components, read the first
    /// component as the year
    #[must_use]
    pub const fn yearfirst(mut self, yearfirst: bool) -> Self {
        self.yearfirst = yearfirst;
        self
    }

    /// Return parsed timestamps as strings in the given strftime format
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.output = TimestampOutput::Format(format.into());
        self
    }

    fn emit(&self, dt: NaiveDateTime, field: Option<&str>) -> Result<Value, ValidationError> {
        match &self.output {
            TimestampOutput::DateTime => Ok(Value::Timestamp(dt)),
            TimestampOutput::Format(fmt) => {
                let mut out = String::new();
                // write! surfaces invalid strftime directives as an error
                // instead of panicking
                write!(out, "{}", dt.format(fmt)).map_err(|_| {
                    ValidationError::malformed(field, Value::Timestamp(dt), "valid date format")
                })?;
                Ok(Value::Str(out))
            },
        }
    }
}

impl FieldType for Timestamp {
    fn name(&self) -> &str {
        "timestamp"
    }

    fn validate(&self, value: Value, field: Option<&str>) -> Result<Value, ValidationError> {
        match value {
            Value::Timestamp(dt) => self.emit(dt, field),
            Value::Str(ref s) => match parse_datetime(s, self.dayfirst, self.yearfirst) {
                Some(dt) => self.emit(dt, field),
                None => Err(ValidationError::malformed(field, value, "date")),
            },
            v => Err(ValidationError::wrong_type(field, v, "date")),
        }
    }

    fn describe(&self) -> String {
        "Any date/time representation".to_string()
    }

    fn clone_box(&self) -> Box<dyn FieldType> {
        Box::new(self.clone())
    }
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn month_from_name(token: &str) -> Option<u32> {
    let t = token.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == t || (t.len() == 3 && m.starts_with(&t)))
        .and_then(|i| u32::try_from(i + 1).ok())
}

/// "11th" -> "11"
fn strip_ordinal(token: &str) -> &str {
    for suffix in ["st", "nd", "rd", "th", "ST", "ND", "RD", "TH"] {
        if let Some(digits) = token.strip_suffix(suffix) {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return digits;
            }
        }
    }
    token
}

/// Two-digit years pivot at 68: 69-99 are 19xx, 0-68 are 20xx
fn expand_year(y: u32) -> i32 {
    let y = i32::try_from(y).unwrap_or(i32::MAX);
    if y >= 100 {
        y
    } else if y <= 68 {
        y + 2000
    } else {
        y + 1900
    }
}

fn parse_u32(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Assemble a date, swapping day and month when the first reading is
/// impossible but the swapped one is not (`13/03/2016` with dayfirst=false)
fn build_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
        if month > 12 && day >= 1 && day <= 12 {
            NaiveDate::from_ymd_opt(year, day, month)
        } else {
            None
        }
    })
}

/// Fuzzy datetime parser. Returns None when nothing plausible matches.
pub(crate) fn parse_datetime(s: &str, dayfirst: bool, yearfirst: bool) -> Option<NaiveDateTime> {
    // Fixed unambiguous formats first
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    // Compact YYYYMMDD
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(s, "%Y%m%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }

    // Separate an optional trailing time-of-day part
    let mut time = NaiveTime::from_hms_opt(0, 0, 0)?;
    let mut date_part = s;
    if let Some(pos) = s.rfind(' ') {
        let candidate = &s[pos + 1..];
        if candidate.contains(':') {
            time = NaiveTime::parse_from_str(candidate, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(candidate, "%H:%M"))
                .ok()?;
            date_part = s[..pos].trim_end();
        }
    }

    let tokens: Vec<&str> = date_part
        .split([' ', '/', '.', '-', ','])
        .filter(|t| !t.is_empty())
        .map(strip_ordinal)
        .collect();

    // Month spelled by name: the 4-digit (or last) numeric token is the
    // year, the other one the day
    if let Some(pos) = tokens.iter().position(|t| month_from_name(t).is_some()) {
        let month = month_from_name(tokens[pos])?;
        let rest: Vec<&str> = tokens
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != pos)
            .map(|(_, t)| *t)
            .collect();
        if rest.len() != 2 {
            return None;
        }
        let first = parse_u32(rest[0])?;
        let second = parse_u32(rest[1])?;
        let (day, year) = if rest[0].len() == 4 { (second, first) } else { (first, second) };
        let date = NaiveDate::from_ymd_opt(expand_year(year), month, day)?;
        return Some(NaiveDateTime::new(date, time));
    }

    // All-numeric date
    if tokens.len() != 3 {
        return None;
    }
    let nums: Vec<u32> = tokens.iter().map(|t| parse_u32(t)).collect::<Option<_>>()?;
    let (year, month, day) = if tokens[0].len() == 4 {
        (expand_year(nums[0]), nums[1], nums[2])
    } else if tokens[2].len() == 4 {
        if dayfirst {
            (expand_year(nums[2]), nums[1], nums[0])
        } else {
            (expand_year(nums[2]), nums[0], nums[1])
        }
    } else if yearfirst {
        (expand_year(nums[0]), nums[1], nums[2])
    } else if dayfirst {
        (expand_year(nums[2]), nums[1], nums[0])
    } else {
        (expand_year(nums[2]), nums[0], nums[1])
    };

    let date = build_date(year, month, day)?;
    Some(NaiveDateTime::new(date, time))
}
