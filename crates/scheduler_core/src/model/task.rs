//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its creation payload.
//! - Validate field invariants before persistence.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - `title` is never empty or whitespace-only.
//! - `repeat == RecurrenceRule::None` marks a one-shot task.

use crate::model::date::{DateParseError, TaskDate};
use crate::recurrence::rule::{InvalidRule, RecurrenceRule};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned task identifier.
pub type TaskId = i64;

/// Field-level validation failure for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Update request did not carry an identifier.
    MissingId,
    /// Date is not a valid `YYYYMMDD` day.
    InvalidDate(DateParseError),
    /// Repeat expression was rejected by the rule parser.
    InvalidRepeat(InvalidRule),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::MissingId => write!(f, "task ID is required"),
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::InvalidRepeat(err) => write!(f, "invalid repeat rule: {err}"),
        }
    }
}

impl Error for TaskValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(err) => Some(err),
            Self::InvalidRepeat(err) => Some(err),
            Self::EmptyTitle | Self::MissingId => None,
        }
    }
}

impl From<DateParseError> for TaskValidationError {
    fn from(value: DateParseError) -> Self {
        Self::InvalidDate(value)
    }
}

impl From<InvalidRule> for TaskValidationError {
    fn from(value: InvalidRule) -> Self {
        Self::InvalidRepeat(value)
    }
}

/// Persisted scheduled task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Current due date.
    pub date: TaskDate,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    /// Recurrence rule; `None` for one-shot tasks.
    #[serde(default)]
    pub repeat: RecurrenceRule,
}

/// Task fields accepted by the store before an identifier exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: TaskDate,
    pub title: String,
    pub comment: String,
    pub repeat: RecurrenceRule,
}

impl Task {
    /// Validates invariants not already guaranteed by field types.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }

    /// Whether the due date is strictly before `today`.
    ///
    /// Overdue is derived, never stored.
    pub fn is_overdue(&self, today: TaskDate) -> bool {
        self.date < today
    }

    /// Whether completion reschedules instead of removing this task.
    pub fn is_recurring(&self) -> bool {
        self.repeat.is_recurring()
    }
}

impl NewTask {
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }

    /// Attaches a store-assigned identifier.
    pub fn with_id(self, id: TaskId) -> Task {
        Task {
            id,
            date: self.date,
            title: self.title,
            comment: self.comment,
            repeat: self.repeat,
        }
    }
}

/// Rejects empty and whitespace-only titles.
pub fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(())
}
