//! Task model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Priority, TaskStatus};
use crate::error::{PlanError, Result};

fn default_confidence() -> f64 {
    1.0
}

/// A unit of work inside a plan.
///
/// `status` and `completed_at` can only be changed through
/// [`crate::lifecycle::TaskLifecycle`], which keeps them consistent with each
/// other. Scheduling attributes (earliest start, slack, ...) are not stored
/// here; they live on [`crate::schedule::Schedule`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Plan-scoped identifier such as `T1`
    #[serde(rename = "id", alias = "task_id")]
    pub task_id: String,

    /// Storage-level numeric identifier, assigned on import
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<u64>,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Length of the task in working days
    pub duration_days: u32,

    /// Ids of tasks in the same plan that must finish first
    #[serde(default)]
    pub depends_on: Vec<String>,

    #[serde(default)]
    pub priority: Priority,

    /// Generator's confidence in the estimate, 0.0 to 1.0
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    #[serde(default)]
    status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<Timestamp>,
}

impl Task {
    /// Creates a pending task with default priority and full confidence.
    pub fn new(task_id: impl Into<String>, title: impl Into<String>, duration_days: u32) -> Self {
        Self {
            task_id: task_id.into(),
            record_id: None,
            title: title.into(),
            description: String::new(),
            duration_days,
            depends_on: Vec::new(),
            priority: Priority::default(),
            confidence: default_confidence(),
            status: TaskStatus::default(),
            completed_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_dependencies<I, S>(mut self, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = depends_on.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    /// True exactly when the status is `completed`.
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Writes a status together with its completion stamp.
    ///
    /// Callers are expected to have validated the transition.
    pub(crate) fn apply_status(&mut self, status: TaskStatus, now: Timestamp) {
        if status == TaskStatus::Completed {
            if self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
        } else {
            self.completed_at = None;
        }
        self.status = status;
    }

    /// Makes the completion stamp agree with the status.
    ///
    /// A stale stamp on an unfinished task is dropped; a completed task
    /// without one is stamped with `fallback`.
    pub(crate) fn normalize(&mut self, fallback: Timestamp) {
        if self.status == TaskStatus::Completed {
            self.completed_at.get_or_insert(fallback);
        } else {
            self.completed_at = None;
        }
    }

    /// Checks the per-task invariants that do not need the rest of the plan.
    pub fn validate(&self) -> Result<()> {
        if self.task_id.trim().is_empty() {
            return Err(PlanError::invalid_input("id").with_reason("Task id cannot be empty"));
        }
        if self.duration_days == 0 {
            return Err(PlanError::invalid_input("duration_days").with_reason(format!(
                "Task '{}' must last at least one working day",
                self.task_id
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(PlanError::invalid_input("confidence").with_reason(format!(
                "Task '{}' has confidence {} outside 0.0..=1.0",
                self.task_id, self.confidence
            )));
        }
        Ok(())
    }
}
