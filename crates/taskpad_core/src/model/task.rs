//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, services and views.
//! - Allocate collection-unique task ids.
//!
//! # Invariants
//! - `text` is trimmed and never empty.
//! - `created_at` is set once at creation and never mutated.
//! - Ids stay within `0..=MAX_TASK_ID`, the integers a JSON number holds exactly.
//! - Ids handed out by one `TaskIdAllocator` never collide with the collection.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Largest id a stored blob can carry without precision loss (2^53 - 1).
pub const MAX_TASK_ID: i64 = 9_007_199_254_740_991;

/// Stable identifier of a task inside one collection.
///
/// Serialized as a bare JSON number (epoch milliseconds at creation time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user-entered to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    /// ISO-8601 UTC timestamp, serialized as `createdAt`.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Task {
    /// Creates an incomplete task stamped with `created_at`.
    ///
    /// Text is trimmed here; callers decide whether empty input is a no-op.
    pub fn new(id: TaskId, text: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.trim().to_string(),
            completed: false,
            created_at: format_timestamp(created_at),
        }
    }

    /// Validates record invariants.
    ///
    /// # Errors
    /// - `EmptyText` when text is empty after trimming.
    /// - `UntrimmedText` when text carries leading/trailing whitespace.
    /// - `InvalidCreatedAt` when `created_at` is not RFC 3339.
    /// - `IdOutOfRange` when `id` is negative or above `MAX_TASK_ID`.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if !(0..=MAX_TASK_ID).contains(&self.id.0) {
            return Err(TaskValidationError::IdOutOfRange { id: self.id });
        }
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return Err(TaskValidationError::EmptyText { id: self.id });
        }
        if trimmed.len() != self.text.len() {
            return Err(TaskValidationError::UntrimmedText { id: self.id });
        }
        if DateTime::parse_from_rfc3339(&self.created_at).is_err() {
            return Err(TaskValidationError::InvalidCreatedAt {
                id: self.id,
                value: self.created_at.clone(),
            });
        }
        Ok(())
    }
}

/// Formats a timestamp the way browsers' `toISOString()` does.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Task invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyText { id: TaskId },
    UntrimmedText { id: TaskId },
    InvalidCreatedAt { id: TaskId, value: String },
    IdOutOfRange { id: TaskId },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText { id } => write!(f, "task {id} has empty text"),
            Self::UntrimmedText { id } => write!(f, "task {id} text is not trimmed"),
            Self::InvalidCreatedAt { id, value } => {
                write!(f, "task {id} has invalid createdAt `{value}`")
            }
            Self::IdOutOfRange { id } => {
                write!(f, "task id {id} is outside 0..={MAX_TASK_ID}")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Hands out millisecond-flavoured ids.
///
/// `next` returns `now_ms` unless that would not exceed the last id issued,
/// in which case it returns `last + 1`. When that candidate leaves
/// `0..=MAX_TASK_ID`, the lowest id not used by `taken` is returned instead.
#[derive(Debug, Clone, Default)]
pub struct TaskIdAllocator {
    last: Option<i64>,
}

impl TaskIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the allocator so it never reissues an id present in `tasks`.
    pub fn seeded_from(tasks: &[Task]) -> Self {
        Self {
            last: tasks.iter().map(|task| task.id.0).max(),
        }
    }

    pub fn next(&mut self, now_ms: i64, taken: &[Task]) -> TaskId {
        let candidate = match self.last {
            Some(last) if now_ms <= last => last.checked_add(1),
            _ => Some(now_ms),
        }
        .filter(|id| (0..=MAX_TASK_ID).contains(id));

        match candidate {
            Some(id) => {
                self.last = Some(id);
                TaskId(id)
            }
            None => lowest_unused(taken),
        }
    }
}

fn lowest_unused(taken: &[Task]) -> TaskId {
    let used: HashSet<i64> = taken.iter().map(|task| task.id.0).collect();
    // At most `taken.len()` ids are used, so the scan ends within len + 1 steps.
    let id = (0..=MAX_TASK_ID)
        .find(|id| !used.contains(id))
        .unwrap_or(MAX_TASK_ID);
    TaskId(id)
}
