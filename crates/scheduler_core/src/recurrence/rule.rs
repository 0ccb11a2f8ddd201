//! Recurrence rule parsing.
//!
//! # Invariants
//! - Parsing is total: every string maps to exactly one rule or one error.
//! - `Display` re-encodes a rule into the form `parse` accepts.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Smallest accepted interval for a daily rule.
pub const MIN_INTERVAL_DAYS: u16 = 1;
/// Largest accepted interval for a daily rule.
pub const MAX_INTERVAL_DAYS: u16 = 400;

/// Typed recurrence rule carried through the core.
///
/// Persisted and sent on the wire as its textual encoding only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecurrenceRule {
    /// Empty rule; the task is one-shot.
    #[default]
    None,
    /// `d <n>`: every `interval_days` days.
    Daily { interval_days: u16 },
    /// `y`: same month/day every year.
    Yearly,
}

/// Reason a repeat expression was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRule {
    /// Daily rule with a missing, non-numeric or out-of-range interval.
    InvalidInterval,
    /// Yearly rule followed by extra tokens.
    YearlyTakesNoParameters,
    /// Unknown leading token or too many tokens.
    Unsupported,
}

impl Display for InvalidRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInterval => write!(f, "invalid or out-of-range interval"),
            Self::YearlyTakesNoParameters => write!(f, "yearly rule takes no parameters"),
            Self::Unsupported => write!(f, "unsupported rule"),
        }
    }
}

impl Error for InvalidRule {}

impl RecurrenceRule {
    /// Parses a repeat expression.
    ///
    /// Tokens are separated by exactly one space; the empty string is
    /// `RecurrenceRule::None`.
    pub fn parse(repeat: &str) -> Result<Self, InvalidRule> {
        if repeat.is_empty() {
            return Ok(Self::None);
        }

        let tokens = repeat.split(' ').collect::<Vec<_>>();
        match tokens.as_slice() {
            ["d"] => Err(InvalidRule::InvalidInterval),
            ["d", interval] => {
                parse_interval(interval).map(|interval_days| Self::Daily { interval_days })
            }
            ["y"] => Ok(Self::Yearly),
            ["y", _] => Err(InvalidRule::YearlyTakesNoParameters),
            _ => Err(InvalidRule::Unsupported),
        }
    }

    /// Whether completing a task with this rule reschedules it.
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::None)
    }
}

fn parse_interval(value: &str) -> Result<u16, InvalidRule> {
    value
        .parse::<u16>()
        .ok()
        .filter(|days| (MIN_INTERVAL_DAYS..=MAX_INTERVAL_DAYS).contains(days))
        .ok_or(InvalidRule::InvalidInterval)
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Daily { interval_days } => write!(f, "d {interval_days}"),
            Self::Yearly => write!(f, "y"),
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = InvalidRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecurrenceRule {
    type Error = InvalidRule;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecurrenceRule> for String {
    fn from(value: RecurrenceRule) -> Self {
        value.to_string()
    }
}
