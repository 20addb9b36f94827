//! Display implementations for domain models.
//!
//! Everything renders as markdown so the terminal renderer and MCP clients
//! get the same text.

use std::fmt;

use jiff::civil::Date;

use super::{collections::PlanSummaries, datetime::LocalDateTime};
use crate::{
    lifecycle::Timeliness,
    models::{Goal, GoalSummary, PlanSummary, PlanType, Priority, Task, TaskStatus},
    schedule::TaskTiming,
    PlanModel,
};

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Task {
    fn fmt_task(
        &self,
        f: &mut fmt::Formatter<'_>,
        timing: Option<&TaskTiming>,
        timeliness: Option<Timeliness>,
    ) -> fmt::Result {
        let critical = if timing.is_some_and(TaskTiming::is_critical) {
            " ★"
        } else {
            ""
        };
        writeln!(
            f,
            "### {}. {} ({}){critical}",
            self.task_id,
            self.title,
            self.status().with_icon()
        )?;
        writeln!(f)?;

        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }

        let unit = if self.duration_days == 1 { "day" } else { "days" };
        writeln!(f, "- Duration: {} {unit}", self.duration_days)?;
        writeln!(f, "- Priority: {}", self.priority)?;
        if !self.depends_on.is_empty() {
            writeln!(f, "- Depends on: {}", self.depends_on.join(", "))?;
        }
        if let Some(timing) = timing {
            writeln!(
                f,
                "- Window: {} to {} (latest {} to {})",
                timing.earliest_start_date,
                timing.earliest_finish_date,
                timing.latest_start_date,
                timing.latest_finish_date
            )?;
            writeln!(f, "- Slack: {} days", timing.slack)?;
        }
        if let Some(timeliness) = timeliness {
            writeln!(f, "- Timeliness: {timeliness}")?;
        }
        if let Some(completed_at) = self.completed_at() {
            writeln!(f, "- Completed: {}", LocalDateTime(&completed_at))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_task(f, None, None)
    }
}

/// A single task shown with its computed schedule.
pub struct ScheduledTask<'a> {
    task: &'a Task,
    timing: &'a TaskTiming,
    timeliness: Option<Timeliness>,
}

impl<'a> ScheduledTask<'a> {
    /// Looks up `task_id` in `model`; `None` when the plan has no such task.
    pub fn find(model: &'a PlanModel, task_id: &str) -> Option<Self> {
        Some(Self {
            task: model.task(task_id)?,
            timing: model.timing(task_id)?,
            timeliness: None,
        })
    }

    pub fn as_of(mut self, today: Date) -> Self {
        self.timeliness = Some(Timeliness::derive(self.task.status(), self.timing, today));
        self
    }
}

impl fmt::Display for ScheduledTask<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.task.fmt_task(f, Some(self.timing), self.timeliness)
    }
}

/// Full markdown report of a computed plan.
///
/// With a reference date set via [`PlanReport::as_of`], each task also shows
/// whether it is on schedule.
pub struct PlanReport<'a> {
    model: &'a PlanModel,
    today: Option<Date>,
}

impl<'a> PlanReport<'a> {
    pub fn new(model: &'a PlanModel) -> Self {
        Self { model, today: None }
    }

    pub fn as_of(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }
}

impl fmt::Display for PlanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model;
        let plan = model.plan();
        let progress = model.progress();

        writeln!(f, "# {}. {}", plan.id, plan.headline())?;
        writeln!(f)?;

        writeln!(f, "- Type: {}", plan.plan_type)?;
        writeln!(f, "- Goal: {}", plan.goal_id)?;
        writeln!(f, "- Start: {}", model.schedule().start_date())?;
        writeln!(f, "- Estimated completion: {}", model.estimated_completion())?;
        writeln!(f, "- Duration: {} working days", model.total_duration_days())?;
        writeln!(
            f,
            "- Progress: {}/{} tasks ({}%)",
            progress.completed, progress.total, progress.percent
        )?;
        if !model.critical_path().is_empty() {
            writeln!(f, "- Critical path: {}", model.critical_path().join(" → "))?;
        }
        if let Some(deadline) = model.constraints().deadline {
            writeln!(f, "- Deadline: {deadline}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&plan.created_at))?;

        if let Some(infeasible) = model.deadline_infeasible() {
            writeln!(f)?;
            writeln!(
                f,
                "**Warning**: expected finish {} is {} working days past the deadline {}",
                infeasible.expected_finish, infeasible.overrun_days, infeasible.deadline
            )?;
        }

        let rest = plan
            .plan_summary
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .skip(1)
            .collect::<Vec<_>>()
            .join("\n");
        let rest = rest.trim();
        if !rest.is_empty() {
            writeln!(f)?;
            writeln!(f, "{rest}")?;
        }

        if model.tasks().is_empty() {
            return writeln!(f, "\nNo tasks in this plan.");
        }

        writeln!(f, "\n## Tasks")?;
        writeln!(f)?;
        for (task, timing) in model.scheduled_tasks() {
            let mut entry = ScheduledTask {
                task,
                timing,
                timeliness: None,
            };
            if let Some(today) = self.today {
                entry = entry.as_of(today);
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// The critical path of a plan as a numbered list.
pub struct CriticalPath<'a>(pub &'a PlanModel);

impl fmt::Display for CriticalPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.0;
        writeln!(f, "# Critical path of plan {}", model.plan().id)?;
        writeln!(f)?;
        if model.critical_path().is_empty() {
            return writeln!(f, "No tasks in this plan.");
        }
        for (n, task_id) in model.critical_path().iter().enumerate() {
            let (Some(task), Some(timing)) = (model.task(task_id), model.timing(task_id)) else {
                continue;
            };
            writeln!(
                f,
                "{}. {} {} ({} to {}, {})",
                n + 1,
                task.task_id,
                task.title,
                timing.earliest_start_date,
                timing.earliest_finish_date,
                task.status()
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{} working days, finishing {}",
            model.total_duration_days(),
            model.estimated_completion()
        )
    }
}

impl fmt::Display for PlanModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        PlanReport::new(self).fmt(f)
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} (ID: {}) ({}/{})",
            self.headline, self.id, self.completed_tasks, self.total_tasks
        )?;
        writeln!(f)?;
        writeln!(f, "- **Type**: {}", self.plan_type)?;
        writeln!(
            f,
            "- **Schedule**: {} to {} ({} working days)",
            self.start_date, self.estimated_completion, self.total_duration_days
        )?;
        writeln!(f, "- **Progress**: {}%", self.progress_percent)?;
        if let Some(overrun) = self.deadline_overrun_days {
            writeln!(f, "- **Deadline**: missed by {overrun} working days")?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Goal {}. {}", self.id, self.headline())?;
        writeln!(f)?;
        let text = self.goal_text.trim();
        if text != self.headline() {
            writeln!(f, "{text}")?;
            writeln!(f)?;
        }

        let constraints = &self.constraints;
        if let Some(deadline) = constraints.deadline {
            writeln!(f, "- Deadline: {deadline}")?;
        }
        writeln!(f, "- Hours per day: {}", constraints.max_hours_per_day)?;
        let weekends = if constraints.no_work_on_weekends {
            "off"
        } else {
            "working days"
        };
        writeln!(f, "- Weekends: {weekends}")?;
        if !constraints.unavailable_dates.is_empty() {
            let dates: Vec<String> = constraints
                .unavailable_dates
                .iter()
                .map(ToString::to_string)
                .collect();
            writeln!(f, "- Unavailable: {}", dates.join(", "))?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))
    }
}

impl fmt::Display for GoalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.headline, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Plans**: {}", self.plan_count)?;
        if let Some(deadline) = self.deadline {
            writeln!(f, "- **Deadline**: {deadline}")?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}

/// A goal followed by the summaries of its plans.
pub struct GoalDetails {
    pub goal: Goal,
    pub plans: PlanSummaries,
}

impl fmt::Display for GoalDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.goal)?;
        write!(f, "{}", self.plans)
    }
}
