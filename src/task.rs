//! Task records: the persisted entity built from parsed commands.
//!
//! A [`Task`] is what the store keeps and the HTTP boundary returns. The
//! parser itself produces a [`crate::command::ParsedCommand`]; callers
//! promote it to a `Task` with [`Task::new`], which mints the id and the
//! creation timestamp.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task priority level, stored and exposed as numeric levels 1–3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    /// Numeric level (1 = low, 2 = medium, 3 = high).
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Lowercase word used in confirmation messages and model labels.
    pub fn word(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Map a numeric level back to a priority.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    /// Map a textual label ("low" / "medium" / "high", any case) to a
    /// priority. This is the fixed table the classifier fallback goes
    /// through; unrecognized labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Low
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.level()
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Priority::from_level(level).ok_or_else(|| format!("invalid priority level: {level}"))
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.word())
    }
}

/// A persisted task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub done: bool,
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<DateTime<Local>>,
    pub created_at: DateTime<Local>,
}

impl Task {
    /// Create a fresh (not-done) task with a new id and the current
    /// creation timestamp.
    pub fn new(
        name: impl Into<String>,
        priority: Priority,
        category: impl Into<String>,
        due_date: Option<DateTime<Local>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            done: false,
            priority,
            category: category.into(),
            due_date,
            created_at: Local::now(),
        }
    }

    /// Human-readable confirmation sentence for a newly created task,
    /// e.g. `Task 'submit report' added with high priority due Mar 03, 2026`.
    pub fn confirmation_message(&self) -> String {
        let mut msg = format!("Task '{}' added with {} priority", self.name, self.priority);
        if let Some(due) = self.due_date {
            msg.push_str(&format!(" due {}", due.format("%b %d, %Y")));
        }
        msg
    }
}
