//! Summary rows for plan and goal listings.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Goal, PlanType};
use crate::PlanModel;

/// Compact, list-friendly view of a computed plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    /// Plan ID
    pub id: u64,
    /// Goal the plan belongs to
    pub goal_id: u64,
    /// First line of the plan summary
    pub headline: String,
    pub plan_type: PlanType,
    pub start_date: Date,
    pub estimated_completion: Date,
    /// Working days from first start to last finish
    pub total_duration_days: i64,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Number of zero-slack tasks
    pub critical_tasks: usize,
    pub progress_percent: u8,
    /// Working days past the deadline, when the deadline cannot be met
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_overrun_days: Option<i64>,
    /// Creation timestamp
    pub created_at: Timestamp,
}

impl From<&PlanModel> for PlanSummary {
    fn from(model: &PlanModel) -> Self {
        let plan = model.plan();
        let progress = model.progress();
        Self {
            id: plan.id,
            goal_id: plan.goal_id,
            headline: plan.headline().to_string(),
            plan_type: plan.plan_type,
            start_date: model.schedule().start_date(),
            estimated_completion: model.estimated_completion(),
            total_duration_days: model.total_duration_days(),
            total_tasks: progress.total,
            completed_tasks: progress.completed,
            critical_tasks: model.critical_path().len(),
            progress_percent: progress.percent,
            deadline_overrun_days: model.deadline_infeasible().map(|d| d.overrun_days),
            created_at: plan.created_at,
        }
    }
}

/// List row for a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalSummary {
    pub id: u64,
    /// First line of the goal text
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Date>,
    /// Number of stored plans generated for the goal
    pub plan_count: usize,
    pub created_at: Timestamp,
}

impl GoalSummary {
    pub fn new(goal: &Goal, plan_count: usize) -> Self {
        Self {
            id: goal.id,
            headline: goal.headline().to_string(),
            deadline: goal.constraints.deadline,
            plan_count,
            created_at: goal.created_at,
        }
    }
}
