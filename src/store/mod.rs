//! Durable task persistence.
//!
//! A redb-backed store with case-insensitive name uniqueness and
//! filter/sort listing. The parser core never touches this layer; callers
//! promote a [`crate::command::ParsedCommand`] to a [`crate::task::Task`]
//! and hand it over.

mod durable;

pub use durable::TaskStore;

use crate::error::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Done-state filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoneFilter {
    /// All tasks.
    #[default]
    Any,
    /// Completed tasks only.
    Done,
    /// Open tasks only.
    Pending,
}

impl DoneFilter {
    /// Interpret a query-string value: `"true"` / `"false"` select a side,
    /// anything else (including absence) means no filter.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("true") => Self::Done,
            Some("false") => Self::Pending,
            _ => Self::Any,
        }
    }

    pub(crate) fn admits(self, done: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Done => done,
            Self::Pending => !done,
        }
    }
}

/// Sort order for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// Creation time, oldest first. The default.
    #[default]
    Created,
    /// Priority, highest first.
    Priority,
    /// Due date, soonest first; tasks without one sort last.
    Due,
    /// Category, ascending.
    Category,
}

impl TaskSort {
    /// Interpret a query-string value; unknown values fall back to
    /// creation order.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("priority") => Self::Priority,
            Some("due") => Self::Due,
            Some("category") => Self::Category,
            _ => Self::Created,
        }
    }
}
