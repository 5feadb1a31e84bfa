//! Task record: the one data structure the whole app revolves around.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::TicklerError;
use super::ids::TaskId;

/// Display text of a task. Never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskText(String);

impl TaskText {
    /// Trim and validate user input.
    pub fn new(s: impl AsRef<str>) -> Result<Self, TicklerError> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TicklerError::EmptyTaskText);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskText {
    type Error = TicklerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskText> for String {
    fn from(value: TaskText) -> Self {
        value.0
    }
}

impl fmt::Display for TaskText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single to-do entry.
///
/// `reminder_at` is an absolute point in time. It is present only until the
/// reminder fires, then cleared; a reminder never re-fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub text: TaskText,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    pub fn new(id: TaskId, text: TaskText, reminder_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            text,
            completed: false,
            reminder_at,
        }
    }

    pub fn has_pending_reminder(&self) -> bool {
        self.reminder_at.is_some()
    }

    /// Flip the completion flag, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    /// Consume the reminder. Returns `false` if there was nothing to clear.
    pub fn clear_reminder(&mut self) -> bool {
        self.reminder_at.take().is_some()
    }

    /// Reminder time rendered in the local timezone, for list labels.
    pub fn reminder_label(&self) -> Option<String> {
        self.reminder_at
            .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
    }
}
