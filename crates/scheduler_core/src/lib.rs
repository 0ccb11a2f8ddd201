//! Core domain logic for the task scheduler.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod recurrence;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::date::{DateParseError, TaskDate};
pub use model::task::{NewTask, Task, TaskId, TaskValidationError};
pub use recurrence::advance::{next_occurrence, next_occurrence_str, AdvanceError};
pub use recurrence::rule::{InvalidRule, RecurrenceRule, MAX_INTERVAL_DAYS, MIN_INTERVAL_DAYS};
pub use repo::task_repo::{
    RepoError, RepoResult, SqliteTaskRepository, TaskListQuery, TaskRepository,
};
pub use service::clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use service::task_service::{
    Completion, ServiceError, TaskDraft, TaskService, TaskUpdate,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
