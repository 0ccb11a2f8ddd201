//! Fixed-form calendar dates.
//!
//! # Responsibility
//! - Parse and format the `YYYYMMDD` wire/storage form.
//! - Provide the calendar steps used by recurrence rules.
//!
//! # Invariants
//! - A `TaskDate` carries no time-of-day, so every comparison is by day.
//! - `format(parse(s)) == s` for every accepted `s`.
//! - Years stay within `0..=9999`; steps past that bound return `None`.

use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("valid date shape regex"));

const MAX_YEAR: i32 = 9999;

/// Error returned when a string is not a valid `YYYYMMDD` day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// Input is not exactly eight ASCII digits.
    Malformed(String),
    /// Digits are well-formed but name no calendar day (e.g. `20250230`).
    NotACalendarDay(String),
}

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => {
                write!(f, "invalid date format `{value}`, expected YYYYMMDD")
            }
            Self::NotACalendarDay(value) => write!(f, "`{value}` is not a calendar day"),
        }
    }
}

impl Error for DateParseError {}

/// Whole-day calendar date used for task scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskDate(NaiveDate);

impl TaskDate {
    /// Parses the fixed 8-digit `YYYYMMDD` form.
    pub fn parse(value: &str) -> Result<Self, DateParseError> {
        if !DATE_SHAPE_RE.is_match(value) {
            return Err(DateParseError::Malformed(value.to_string()));
        }

        // Shape check above guarantees ASCII digits, so byte slicing is safe.
        let not_a_day = || DateParseError::NotACalendarDay(value.to_string());
        let year = value[0..4].parse::<i32>().map_err(|_| not_a_day())?;
        let month = value[4..6].parse::<u32>().map_err(|_| not_a_day())?;
        let day = value[6..8].parse::<u32>().map_err(|_| not_a_day())?;

        Self::from_ymd(year, month, day).ok_or_else(not_a_day)
    }

    /// Builds a date from components, `None` when out of range or invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::bounded)
    }

    /// Current calendar day in the server's local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns this date `days` calendar days later.
    pub fn add_days(self, days: u32) -> Option<Self> {
        self.0
            .checked_add_days(Days::new(u64::from(days)))
            .and_then(Self::bounded)
    }

    /// Returns the same month/day one year later.
    ///
    /// Feb 29 rolls over to Mar 1 when the target year is not a leap year.
    pub fn add_year(self) -> Option<Self> {
        let year = self.0.year().checked_add(1)?;
        NaiveDate::from_ymd_opt(year, self.0.month(), self.0.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
            .and_then(Self::bounded)
    }

    /// Formats as `YYYYMMDD`.
    pub fn format(&self) -> String {
        self.to_string()
    }

    fn bounded(date: NaiveDate) -> Option<Self> {
        (0..=MAX_YEAR).contains(&date.year()).then_some(Self(date))
    }
}

impl Display for TaskDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for TaskDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TaskDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TaskDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
