//! Domain model for scheduled tasks.
//!
//! # Responsibility
//! - Define the canonical task record and its fixed-form date type.
//!
//! # Invariants
//! - Every persisted task is identified by a store-assigned `TaskId`.
//! - Dates and repeat rules are typed; raw strings exist only at boundaries.

pub mod date;
pub mod task;
