//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the task store contract consumed by the lifecycle service.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod task_repo;
