//! Next-occurrence computation.
//!
//! # Invariants
//! - The returned date is never before `now`.
//! - A candidate equal to `now` is accepted, not stepped past.
//! - Every missed occurrence is skipped in a single call.

use crate::model::date::{DateParseError, TaskDate};
use crate::recurrence::rule::{InvalidRule, RecurrenceRule};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error returned by next-occurrence computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceError {
    /// Advancement was requested for a one-shot task.
    MissingRule,
    /// Source date is not a valid `YYYYMMDD` day.
    InvalidDate(DateParseError),
    /// Repeat expression failed to parse.
    InvalidRule(InvalidRule),
    /// Stepping would leave the supported calendar range.
    OutOfRange,
}

impl Display for AdvanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRule => write!(f, "repetition rule is missing"),
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::InvalidRule(err) => write!(f, "invalid repeat rule: {err}"),
            Self::OutOfRange => write!(f, "next occurrence is beyond the supported date range"),
        }
    }
}

impl Error for AdvanceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(err) => Some(err),
            Self::InvalidRule(err) => Some(err),
            Self::MissingRule | Self::OutOfRange => None,
        }
    }
}

impl From<DateParseError> for AdvanceError {
    fn from(value: DateParseError) -> Self {
        Self::InvalidDate(value)
    }
}

impl From<InvalidRule> for AdvanceError {
    fn from(value: InvalidRule) -> Self {
        Self::InvalidRule(value)
    }
}

/// Returns the first occurrence of `rule` after `date` that is on or after `now`.
///
/// At least one rule step is always applied, even when `date >= now`.
///
/// # Errors
/// - `MissingRule` for `RecurrenceRule::None`.
/// - `OutOfRange` when stepping passes year 9999.
pub fn next_occurrence(
    now: TaskDate,
    date: TaskDate,
    rule: RecurrenceRule,
) -> Result<TaskDate, AdvanceError> {
    let mut candidate = step(date, rule)?;
    while candidate < now {
        candidate = step(candidate, rule)?;
    }
    Ok(candidate)
}

/// String-boundary form of [`next_occurrence`].
///
/// `date` is validated before `repeat`; an empty `repeat` is `MissingRule`.
pub fn next_occurrence_str(
    now: TaskDate,
    date: &str,
    repeat: &str,
) -> Result<TaskDate, AdvanceError> {
    let date = TaskDate::parse(date)?;
    if repeat.is_empty() {
        return Err(AdvanceError::MissingRule);
    }
    let rule = RecurrenceRule::parse(repeat)?;
    next_occurrence(now, date, rule)
}

fn step(date: TaskDate, rule: RecurrenceRule) -> Result<TaskDate, AdvanceError> {
    let next = match rule {
        RecurrenceRule::None => return Err(AdvanceError::MissingRule),
        RecurrenceRule::Daily { interval_days } => date.add_days(u32::from(interval_days)),
        RecurrenceRule::Yearly => date.add_year(),
    };
    next.ok_or(AdvanceError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::{next_occurrence, next_occurrence_str, AdvanceError};
    use crate::model::date::TaskDate;
    use crate::recurrence::rule::{InvalidRule, RecurrenceRule};

    fn date(value: &str) -> TaskDate {
        TaskDate::parse(value).unwrap()
    }

    fn daily(interval_days: u16) -> RecurrenceRule {
        RecurrenceRule::Daily { interval_days }
    }

    #[test]
    fn candidate_equal_to_now_is_returned() {
        let next = next_occurrence(date("20250310"), date("20250301"), daily(3)).unwrap();
        assert_eq!(next, date("20250310"));
    }

    #[test]
    fn yearly_skips_to_first_year_on_or_after_now() {
        let next = next_occurrence(date("20250101"), date("20240615"), RecurrenceRule::Yearly)
            .unwrap();
        assert_eq!(next, date("20250615"));

        let next = next_occurrence(date("20300101"), date("20240615"), RecurrenceRule::Yearly)
            .unwrap();
        assert_eq!(next, date("20300615"));
    }

    #[test]
    fn future_date_still_advances_one_step() {
        let next = next_occurrence(date("20250101"), date("20250601"), daily(7)).unwrap();
        assert_eq!(next, date("20250608"));

        let next = next_occurrence(date("20250101"), date("20250601"), RecurrenceRule::Yearly)
            .unwrap();
        assert_eq!(next, date("20260601"));
    }

    #[test]
    fn leap_day_yearly_rolls_into_march() {
        let next = next_occurrence(date("20240301"), date("20240229"), RecurrenceRule::Yearly)
            .unwrap();
        assert_eq!(next, date("20250301"));
    }

    #[test]
    fn week_of_missed_daily_occurrences_is_skipped_at_once() {
        let next = next_occurrence(date("20250108"), date("20250101"), daily(1)).unwrap();
        assert_eq!(next, date("20250108"));
    }

    #[test]
    fn daily_result_is_minimal_and_not_before_now() {
        let start = date("20240110");
        let now_values = ["20240110", "20240111", "20240301", "20250101", "20260707"];
        for interval in [1_u16, 2, 3, 7, 30, 365, 400] {
            for now in now_values {
                let now = date(now);
                let next = next_occurrence(now, start, daily(interval)).unwrap();
                assert!(next >= now, "interval {interval}: {next} < {now}");

                let mut expected = start.add_days(u32::from(interval)).unwrap();
                while expected < now {
                    expected = expected.add_days(u32::from(interval)).unwrap();
                }
                assert_eq!(next, expected, "interval {interval}, now {now}");
            }
        }
    }

    #[test]
    fn reapplying_with_same_now_advances_exactly_one_step() {
        let now = date("20250310");
        let first = next_occurrence(now, date("20250301"), daily(3)).unwrap();
        let second = next_occurrence(now, first, daily(3)).unwrap();
        assert_eq!(second, date("20250313"));
    }

    #[test]
    fn none_rule_is_missing_rule() {
        let err = next_occurrence(date("20250101"), date("20250101"), RecurrenceRule::None)
            .unwrap_err();
        assert_eq!(err, AdvanceError::MissingRule);
    }

    #[test]
    fn stepping_past_calendar_range_is_out_of_range() {
        let err = next_occurrence(date("20250101"), date("99991231"), daily(1)).unwrap_err();
        assert_eq!(err, AdvanceError::OutOfRange);
    }

    #[test]
    fn string_form_validates_date_then_rule() {
        let now = date("20250101");
        assert!(matches!(
            next_occurrence_str(now, "2025-01-01", "d 1"),
            Err(AdvanceError::InvalidDate(_))
        ));
        assert!(matches!(
            next_occurrence_str(now, "bad", ""),
            Err(AdvanceError::InvalidDate(_))
        ));
        assert_eq!(
            next_occurrence_str(now, "20250101", ""),
            Err(AdvanceError::MissingRule)
        );
        assert_eq!(
            next_occurrence_str(now, "20250101", "d 401"),
            Err(AdvanceError::InvalidRule(InvalidRule::InvalidInterval))
        );
        assert_eq!(
            next_occurrence_str(now, "20241231", "d 5").unwrap(),
            date("20250105")
        );
    }
}
