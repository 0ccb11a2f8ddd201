//! Source of "today" for lifecycle decisions.

use crate::model::date::TaskDate;
use std::sync::Arc;

/// Supplies the current calendar day.
pub trait Clock {
    fn today(&self) -> TaskDate;
}

/// Clock shared across request handlers.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Server-local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> TaskDate {
        TaskDate::today()
    }
}

/// Clock pinned to one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub TaskDate);

impl Clock for FixedClock {
    fn today(&self) -> TaskDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> TaskDate {
        (**self).today()
    }
}
