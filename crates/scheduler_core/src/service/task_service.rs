//! Task lifecycle service.
//!
//! # Responsibility
//! - Normalize dates on creation and update (empty date means today).
//! - Pull past creation dates forward (today, or next occurrence).
//! - Complete tasks: remove one-shot tasks, reschedule recurring ones.
//!
//! # Invariants
//! - Only this service changes a task date as a business side effect.
//! - Update is a full replace and never pulls dates forward.
//! - Completion reads and writes a task inside one repository transaction.
//! - Log lines carry identifiers and outcomes only, never titles/comments.

use crate::model::date::TaskDate;
use crate::model::task::{validate_title, NewTask, Task, TaskId, TaskValidationError};
use crate::recurrence::advance::{next_occurrence, next_occurrence_str, AdvanceError};
use crate::recurrence::rule::RecurrenceRule;
use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};
use crate::service::clock::{Clock, SystemClock};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for task lifecycle use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Caller input was rejected.
    Validation(TaskValidationError),
    /// Target task does not exist.
    NotFound(TaskId),
    /// Next-occurrence computation failed.
    Advance(AdvanceError),
    /// Persistence-layer failure.
    Storage(RepoError),
}

impl ServiceError {
    /// Whether the caller, not the server, is at fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(_) => write!(f, "task not found"),
            Self::Advance(err) => write!(f, "failed to calculate next date: {err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Advance(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<AdvanceError> for ServiceError {
    fn from(value: AdvanceError) -> Self {
        Self::Advance(value)
    }
}

/// Raw creation input as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// `YYYYMMDD` or empty for today.
    pub date: String,
    pub title: String,
    pub comment: String,
    /// Repeat expression or empty for a one-shot task.
    pub repeat: String,
}

/// Raw full-replace input as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub id: Option<TaskId>,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Outcome of marking a task done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// One-shot task was deleted.
    Removed,
    /// Recurring task now waits for this date.
    Rescheduled(TaskDate),
}

/// Task lifecycle facade over a repository implementation.
pub struct TaskService<R: TaskRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service that reads today from the local system date.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: TaskRepository, C: Clock> TaskService<R, C> {
    /// Creates a service with an explicit clock.
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Computes the first occurrence of `repeat` after `date` that is on or
    /// after `now`.
    pub fn next_date(
        &self,
        now: TaskDate,
        date: &str,
        repeat: &str,
    ) -> Result<TaskDate, ServiceError> {
        Ok(next_occurrence_str(now, date, repeat)?)
    }

    /// Creates a task, normalizing and pulling forward its date.
    ///
    /// # Contract
    /// - Title is validated first, then date, then repeat.
    /// - A past date becomes today (one-shot) or the next occurrence
    ///   on or after today (recurring).
    /// - Returns the store-assigned identifier.
    pub fn create_task(&self, draft: &TaskDraft) -> Result<TaskId, ServiceError> {
        let started_at = Instant::now();
        let today = self.clock.today();

        let task = self
            .normalize_draft(draft, today)
            .inspect_err(|err| log_rejected("task_create", None, err))?;
        let recurring = task.repeat.is_recurring();
        let id = self.repo.create_task(&task)?;

        info!(
            "event=task_create module=service status=ok task_id={id} recurring={recurring} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(id)
    }

    /// Lists tasks ordered by due date.
    pub fn list_tasks(&self, limit: Option<u32>) -> Result<Vec<Task>, ServiceError> {
        Ok(self.repo.list_tasks(&TaskListQuery { limit })?)
    }

    /// Gets one task by identifier.
    pub fn get_task(&self, id: TaskId) -> Result<Task, ServiceError> {
        self.repo.get_task(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Replaces every field of an existing task.
    ///
    /// # Contract
    /// - Requires a non-zero identifier, a non-empty title, a valid or empty date
    ///   and a valid or empty repeat expression.
    /// - Stores the date as given; no pull-forward is applied.
    pub fn update_task(&self, update: &TaskUpdate) -> Result<(), ServiceError> {
        let started_at = Instant::now();
        let today = self.clock.today();

        let task = self
            .normalize_update(update, today)
            .inspect_err(|err| log_rejected("task_update", update.id, err))?;
        let id = task.id;

        self.repo.atomically(|repo| -> Result<(), ServiceError> {
            if repo.get_task(id)?.is_none() {
                return Err(ServiceError::NotFound(id));
            }
            repo.update_task(&task)?;
            Ok(())
        })?;

        info!(
            "event=task_update module=service status=ok task_id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Marks a task done.
    ///
    /// One-shot tasks are deleted. Recurring tasks move to the first
    /// occurrence after their stored date that is on or after today; title,
    /// comment and repeat are left untouched.
    pub fn mark_done(&self, id: TaskId) -> Result<Completion, ServiceError> {
        let started_at = Instant::now();
        let today = self.clock.today();

        let completion = self.repo.atomically(|repo| -> Result<Completion, ServiceError> {
            let task = repo.get_task(id)?.ok_or(ServiceError::NotFound(id))?;

            if !task.is_recurring() {
                repo.delete_task(id)?;
                return Ok(Completion::Removed);
            }

            let next = next_occurrence(today, task.date, task.repeat).inspect_err(|err| {
                if *err == AdvanceError::MissingRule {
                    error!("event=task_done module=service status=error task_id={id} error_code=missing_rule");
                }
            })?;
            repo.update_task_date(id, next)?;
            Ok(Completion::Rescheduled(next))
        });

        match &completion {
            Ok(Completion::Removed) => info!(
                "event=task_done module=service status=ok task_id={id} outcome=removed duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Ok(Completion::Rescheduled(next)) => info!(
                "event=task_done module=service status=ok task_id={id} outcome=rescheduled next_date={next} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_rejected("task_done", Some(id), err),
        }
        completion
    }

    /// Deletes a task; `NotFound` when nothing was deleted.
    pub fn delete_task(&self, id: TaskId) -> Result<(), ServiceError> {
        if self.repo.delete_task(id)? == 0 {
            let err = ServiceError::NotFound(id);
            log_rejected("task_delete", Some(id), &err);
            return Err(err);
        }

        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    fn normalize_draft(&self, draft: &TaskDraft, today: TaskDate) -> Result<NewTask, ServiceError> {
        validate_title(&draft.title)?;
        let date = normalize_date(&draft.date, today)?;
        let repeat = RecurrenceRule::parse(&draft.repeat).map_err(TaskValidationError::from)?;

        let date = if date >= today {
            date
        } else if repeat.is_recurring() {
            next_occurrence(today, date, repeat)?
        } else {
            today
        };

        Ok(NewTask {
            date,
            title: draft.title.clone(),
            comment: draft.comment.clone(),
            repeat,
        })
    }

    fn normalize_update(&self, update: &TaskUpdate, today: TaskDate) -> Result<Task, ServiceError> {
        let id = update
            .id
            .filter(|id| *id != 0)
            .ok_or(TaskValidationError::MissingId)?;
        validate_title(&update.title)?;
        let date = normalize_date(&update.date, today)?;
        let repeat = RecurrenceRule::parse(&update.repeat).map_err(TaskValidationError::from)?;

        Ok(Task {
            id,
            date,
            title: update.title.clone(),
            comment: update.comment.clone(),
            repeat,
        })
    }
}

/// Empty input means today; anything else must be a valid `YYYYMMDD` day.
pub fn normalize_date(raw: &str, today: TaskDate) -> Result<TaskDate, TaskValidationError> {
    if raw.is_empty() {
        return Ok(today);
    }
    Ok(TaskDate::parse(raw)?)
}

fn log_rejected(event: &str, id: Option<TaskId>, err: &ServiceError) {
    let task_id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    if err.is_client_error() {
        warn!("event={event} module=service status=rejected task_id={task_id} error={err}");
    } else {
        error!("event={event} module=service status=error task_id={task_id} error={err}");
    }
}
