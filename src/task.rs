use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationReport};
use crate::{Error, Result};

/// A persisted task.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String, // "rec_001", "rec_002", ...
    pub title: String,
    /// Minutes.
    pub duration: u32,
    pub tag: String,
    pub due_date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a task that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub duration: u32,
    pub tag: String,
    pub due_date: String,
}

/// Unvalidated task fields as the user typed them.
///
/// `duration` is kept as text so that entries like `-5` or `12.5` reach
/// the validator instead of failing in a parser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub duration: String,
    pub tag: String,
    pub due_date: String,
}

impl TaskDraft {
    pub fn new(
        title: impl Into<String>,
        duration: impl Display,
        tag: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            duration: duration.to_string(),
            tag: tag.into(),
            due_date: due_date.into(),
        }
    }

    /// Strips surrounding whitespace from the text fields, the way the input
    /// form does before validating.
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            duration: self.duration.trim().to_string(),
            tag: self.tag.trim().to_string(),
            due_date: self.due_date.trim().to_string(),
        }
    }

    pub fn check(&self) -> ValidationReport {
        validation::validate_task(self)
    }

    /// Runs every field check and converts the draft into a [`NewTask`].
    /// All failure messages are returned together. A fractional duration
    /// such as `12.5` is stored as its whole minutes.
    pub fn validate(self) -> Result<NewTask> {
        let report = self.check();
        if !report.is_valid {
            return Err(Error::Validation(report.errors));
        }
        let minutes = self.duration.split('.').next().unwrap_or_default();
        let duration: u32 = minutes
            .parse()
            .map_err(|_| Error::InvalidInput(format!("duration out of range: {}", self.duration)))?;
        Ok(NewTask {
            title: self.title,
            duration,
            tag: self.tag,
            due_date: self.due_date,
        })
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            duration: task.duration.to_string(),
            tag: task.tag.clone(),
            due_date: task.due_date.clone(),
        }
    }
}

impl From<NewTask> for TaskPatch {
    fn from(task: NewTask) -> Self {
        Self {
            title: Some(task.title),
            duration: Some(task.duration),
            tag: Some(task.tag),
            due_date: Some(task.due_date),
        }
    }
}

/// Partial update merged over an existing task. `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub duration: Option<u32>,
    pub tag: Option<String>,
    pub due_date: Option<String>,
}

impl TaskPatch {
    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(duration) = self.duration {
            task.duration = duration;
        }
        if let Some(tag) = self.tag {
            task.tag = tag;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}
