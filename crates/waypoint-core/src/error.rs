//! Error types for the scheduling library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::TaskStatus;

/// Every failure the scheduling core and its document store can report.
///
/// Structural errors (`Cycle`, `DanglingReference`, `DuplicateTask`) reject a
/// plan before anything is scheduled. Lifecycle errors (`InvalidTransition`,
/// `DependencyNotSatisfied`) leave the current snapshot untouched.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The dependency relation contains a cycle
    #[error("Dependency cycle detected: {}", path.join(" → "))]
    Cycle { path: Vec<String> },
    /// A task depends on an id that is not part of the plan
    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    DanglingReference { task: String, dependency: String },
    /// Two tasks share the same plan-scoped id
    #[error("Duplicate task id '{task}'")]
    DuplicateTask { task: String },
    /// The requested status change is not an edge of the lifecycle
    #[error("Task '{task}' cannot move from {from} to {to}")]
    InvalidTransition {
        task: String,
        from: TaskStatus,
        to: TaskStatus,
    },
    /// A task was started before all of its dependencies were completed
    #[error("Task '{task}' is waiting on incomplete dependencies: {}", pending.join(", "))]
    DependencyNotSatisfied { task: String, pending: Vec<String> },
    /// Task not found for the given id within a plan
    #[error("Task '{task}' not found in plan {plan_id}")]
    TaskNotFound { plan_id: u64, task: String },
    /// Plan not found for the given ID
    #[error("Plan with ID {id} not found")]
    PlanNotFound { id: u64 },
    /// Goal not found for the given ID
    #[error("Goal with ID {id} not found")]
    GoalNotFound { id: u64 },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Calendar arithmetic left the supported date range
    #[error("Calendar error: {source}")]
    Calendar {
        #[from]
        source: jiff::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlanError {
        PlanError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlanError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a blocking-task join failure.
    pub(crate) fn join(err: tokio::task::JoinError) -> Self {
        PlanError::Configuration {
            message: format!("Task join error: {err}"),
        }
    }

    /// Whether the error rejects the plan structure itself.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            PlanError::Cycle { .. }
                | PlanError::DanglingReference { .. }
                | PlanError::DuplicateTask { .. }
        )
    }

    /// Whether the error came from a rejected lifecycle mutation.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            PlanError::InvalidTransition { .. } | PlanError::DependencyNotSatisfied { .. }
        )
    }
}

/// Result type alias for scheduling operations
pub type Result<T> = std::result::Result<T, PlanError>;
