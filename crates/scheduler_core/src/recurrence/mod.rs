//! Recurrence engine.
//!
//! # Responsibility
//! - Parse repeat expressions into typed rules (`rule`).
//! - Compute the next occurrence of a recurring task (`advance`).
//!
//! # Invariants
//! - Everything here is pure: no I/O, no clock access, no shared state.
//! - Callers supply "now"; this module never reads the system date.

pub mod advance;
pub mod rule;
