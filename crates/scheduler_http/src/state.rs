//! Shared handler state.
//!
//! # Invariants
//! - One SQLite connection per process, guarded by a mutex; every store
//!   operation (including read-then-write completion) runs under the lock.
//! - Blocking SQLite work never runs on async worker threads.

use crate::error::ApiError;
use rusqlite::Connection;
use scheduler_core::{ServiceError, SharedClock, SqliteTaskRepository, TaskService};
use std::sync::{Arc, Mutex};

/// Per-request service type built by [`AppState::run`].
pub type RequestService<'conn> = TaskService<SqliteTaskRepository<'conn>, SharedClock>;

#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
    clock: SharedClock,
}

impl AppState {
    /// Takes ownership of a connection returned by `scheduler_core::db::open_db*`.
    pub fn new(conn: Connection, clock: SharedClock) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            clock,
        }
    }

    /// Runs `op` against a lifecycle service on the blocking pool.
    pub async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&RequestService<'_>) -> Result<T, ServiceError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let clock = Arc::clone(&self.clock);

        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| ApiError::internal("database connection lock poisoned"))?;
            let repo = SqliteTaskRepository::try_new(&guard).map_err(ServiceError::from)?;
            let service = TaskService::with_clock(repo, clock);
            op(&service).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::internal(format!("request worker failed: {err}")))?
    }
}
