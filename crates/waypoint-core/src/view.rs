//! Serializable read model handed to presentation layers.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use crate::{
    models::{Constraints, PlanType, Priority, TaskStatus},
    progress::{DurationSummary, Progress},
    schedule::DeadlineInfeasible,
    PlanModel,
};

/// A task annotated with its computed schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_days: u32,
    pub depends_on: Vec<String>,
    pub priority: Priority,
    pub confidence: f64,
    pub status: TaskStatus,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    pub earliest_start: Date,
    pub earliest_finish: Date,
    pub latest_start: Date,
    pub latest_finish: Date,
    pub start_offset: i64,
    pub finish_offset: i64,
    pub slack: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_slack: Option<i64>,
    pub is_critical: bool,
}

/// A whole computed plan, tasks in topological order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanView {
    pub id: u64,
    pub goal_id: u64,
    pub plan_type: PlanType,
    pub plan_summary: String,
    pub start_date: Date,
    pub created_at: Timestamp,
    pub constraints: Constraints,
    pub tasks: Vec<TaskView>,
    pub critical_path: Vec<String>,
    pub total_duration_days: i64,
    pub estimated_completion: Date,
    pub progress: Progress,
    pub durations: DurationSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_infeasible: Option<DeadlineInfeasible>,
}

impl PlanModel {
    pub fn view(&self) -> PlanView {
        let plan = self.plan();
        let tasks = self
            .scheduled_tasks()
            .map(|(task, timing)| TaskView {
                id: task.task_id.clone(),
                title: task.title.clone(),
                description: task.description.clone(),
                duration_days: task.duration_days,
                depends_on: task.depends_on.clone(),
                priority: task.priority,
                confidence: task.confidence,
                status: task.status(),
                is_completed: task.is_completed(),
                completed_at: task.completed_at(),
                earliest_start: timing.earliest_start_date,
                earliest_finish: timing.earliest_finish_date,
                latest_start: timing.latest_start_date,
                latest_finish: timing.latest_finish_date,
                start_offset: timing.earliest_start,
                finish_offset: timing.earliest_finish,
                slack: timing.slack,
                deadline_slack: timing.deadline_slack,
                is_critical: timing.is_critical(),
            })
            .collect();

        PlanView {
            id: plan.id,
            goal_id: plan.goal_id,
            plan_type: plan.plan_type,
            plan_summary: plan.plan_summary.clone(),
            start_date: self.schedule().start_date(),
            created_at: plan.created_at,
            constraints: self.constraints().clone(),
            tasks,
            critical_path: self.critical_path().to_vec(),
            total_duration_days: self.total_duration_days(),
            estimated_completion: self.estimated_completion(),
            progress: self.progress(),
            durations: self.duration_summary(),
            deadline_infeasible: self.deadline_infeasible().copied(),
        }
    }
}
