//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{models::Goal, store::PlanDocument, PlanModel};

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<PlanModel> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created plan with ID: {}", self.resource.plan().id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Goal> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created goal with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations.
///
/// The listed changes are shown above the updated resource.
///
/// # Examples
///
/// ```rust
/// use jiff::{civil::date, Timestamp};
/// use waypoint_core::{
///     display::UpdateResult,
///     models::{Constraints, Plan, PlanType, Task},
///     PlanModel,
/// };
///
/// let plan = Plan {
///     id: 7,
///     goal_id: 1,
///     plan_type: PlanType::Moderate,
///     plan_summary: "Garden".to_string(),
///     start_date: date(2024, 3, 4),
///     tasks: vec![Task::new("T1", "Dig beds", 2)],
///     created_at: Timestamp::UNIX_EPOCH,
/// };
/// let model = PlanModel::build(plan, Constraints::default()).unwrap();
/// let result = UpdateResult::with_changes(model, vec!["T1: pending → in_progress".to_string()]);
///
/// let output = result.to_string();
/// assert!(output.starts_with("Updated plan with ID: 7"));
/// assert!(output.contains("- T1: pending → in_progress"));
/// ```
#[derive(Debug)]
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<PlanModel> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated plan with ID: {}", self.resource.plan().id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<PlanDocument> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted plan '{}' (ID: {})",
            self.resource.plan.headline(),
            self.resource.plan.id
        )
    }
}
