//! Plan model definition and the generator's import format.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Constraints, PlanType, Task};

/// One generated schedule for a goal.
///
/// A plan owns its tasks. Critical path, total duration and estimated
/// completion are derived by [`crate::PlanModel`] and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Goal this plan was generated for
    pub goal_id: u64,

    #[serde(default)]
    pub plan_type: PlanType,

    #[serde(default)]
    pub plan_summary: String,

    /// First calendar day the schedule may use
    pub start_date: Date,

    /// Tasks in generator order
    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,
}

impl Plan {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    /// First non-empty line of the summary, used as a heading.
    pub fn headline(&self) -> &str {
        self.plan_summary
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("Untitled plan")
    }
}

/// A plan as handed over by the upstream generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedPlan {
    pub goal_text: String,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub plan_type: PlanType,
    #[serde(default)]
    pub plan_summary: String,
    pub tasks: Vec<Task>,
}
