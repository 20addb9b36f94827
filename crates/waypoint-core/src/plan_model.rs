//! Immutable, fully computed snapshot of a plan.

use std::sync::Arc;

use jiff::{civil::Date, Timestamp};
use log::{debug, info, warn};

use crate::{
    critical::critical_path,
    error::{PlanError, Result},
    graph::TaskGraph,
    lifecycle::{DependencyPolicy, TaskLifecycle, Timeliness},
    models::{Constraints, Plan, PlanSummary, Task, TaskStatus},
    progress::{DurationSummary, Progress},
    schedule::{DeadlineInfeasible, Schedule, ScheduleEngine, TaskTiming},
};

/// A plan together with everything derived from it.
///
/// Snapshots never change. [`PlanModel::set_task_status`] and
/// [`PlanModel::toggle_completion`] return a new snapshot and leave the
/// receiver valid. A status change cannot move anything on the schedule, so
/// the graph and schedule are shared between the two; only the task list and
/// the progress are recomputed. Structural changes need a fresh
/// [`PlanModel::build`].
///
/// # Examples
///
/// ```rust
/// use jiff::{civil::date, Timestamp};
/// use waypoint_core::{
///     models::{Constraints, Plan, PlanType, Task, TaskStatus},
///     DependencyPolicy, PlanModel,
/// };
///
/// let plan = Plan {
///     id: 1,
///     goal_id: 1,
///     plan_type: PlanType::Moderate,
///     plan_summary: "Launch".to_string(),
///     start_date: date(2024, 1, 15),
///     tasks: vec![
///         Task::new("A", "Design", 2),
///         Task::new("B", "Build", 3).with_dependencies(["A"]),
///         Task::new("C", "Docs", 1).with_dependencies(["A"]),
///     ],
///     created_at: Timestamp::UNIX_EPOCH,
/// };
/// let constraints = Constraints {
///     no_work_on_weekends: false,
///     ..Constraints::default()
/// };
///
/// let model = PlanModel::build(plan, constraints).unwrap();
/// assert_eq!(model.critical_path(), ["A", "B"]);
/// assert_eq!(model.total_duration_days(), 5);
///
/// let next = model
///     .set_task_status("A", TaskStatus::InProgress, Timestamp::UNIX_EPOCH, DependencyPolicy::Enforce)
///     .unwrap();
/// assert_eq!(next.task("A").unwrap().status(), TaskStatus::InProgress);
/// assert_eq!(model.task("A").unwrap().status(), TaskStatus::Pending);
/// ```
#[derive(Debug, Clone)]
pub struct PlanModel {
    plan: Plan,
    constraints: Constraints,
    graph: Arc<TaskGraph>,
    schedule: Arc<Schedule>,
    critical_path: Arc<[String]>,
    progress: Progress,
}

impl PlanModel {
    /// Validates and schedules `plan` from its `start_date`.
    ///
    /// Fails on the first structural problem; no partial snapshot is
    /// produced.
    pub fn build(mut plan: Plan, constraints: Constraints) -> Result<Self> {
        constraints.validate()?;
        let created_at = plan.created_at;
        for task in &mut plan.tasks {
            task.validate()?;
            task.normalize(created_at);
        }

        let graph = TaskGraph::build(&plan.tasks)?;
        let calendar = constraints.calendar();
        let schedule = ScheduleEngine::new(&calendar)
            .with_deadline(constraints.deadline)
            .run(&graph, &plan.tasks, plan.start_date)?;
        let critical_path = critical_path(&graph, &schedule);
        let progress = Progress::from_tasks(&plan.tasks);

        if let Some(infeasible) = schedule.deadline_infeasible() {
            warn!(
                "Plan {} finishes on {}, {} working days after the {} deadline",
                plan.id, infeasible.expected_finish, infeasible.overrun_days, infeasible.deadline
            );
        }
        debug!(
            "Plan {}: critical path {:?}, {}% complete",
            plan.id, critical_path, progress.percent
        );

        Ok(Self {
            plan,
            constraints,
            graph: Arc::new(graph),
            schedule: Arc::new(schedule),
            critical_path: critical_path.into(),
            progress,
        })
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn tasks(&self) -> &[Task] {
        &self.plan.tasks
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Zero-slack task ids in topological order.
    pub fn critical_path(&self) -> &[String] {
        &self.critical_path
    }

    pub fn total_duration_days(&self) -> i64 {
        self.schedule.total_duration_days()
    }

    pub fn estimated_completion(&self) -> Date {
        self.schedule.estimated_completion()
    }

    pub fn deadline_infeasible(&self) -> Option<&DeadlineInfeasible> {
        self.schedule.deadline_infeasible()
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.graph
            .index_of(task_id)
            .and_then(|i| self.plan.tasks.get(i))
    }

    pub fn timing(&self, task_id: &str) -> Option<&TaskTiming> {
        self.graph
            .index_of(task_id)
            .and_then(|i| self.schedule.timing(i))
    }

    pub fn is_critical(&self, task_id: &str) -> bool {
        self.timing(task_id).is_some_and(TaskTiming::is_critical)
    }

    /// Tasks paired with their timings, in topological order.
    pub fn scheduled_tasks(&self) -> impl Iterator<Item = (&Task, &TaskTiming)> + '_ {
        self.graph.order_indices().iter().filter_map(|&i| {
            self.plan
                .tasks
                .get(i)
                .zip(self.schedule.timing(i))
        })
    }

    /// Tasks that could be started now: not started, not finished, and with
    /// every dependency completed. Topological order.
    pub fn actionable_tasks(&self) -> Vec<&Task> {
        self.scheduled_tasks()
            .map(|(task, _)| task)
            .filter(|task| TaskLifecycle::can_transition(task.status(), TaskStatus::InProgress))
            .filter(|task| TaskLifecycle::is_ready(task, &self.plan.tasks))
            .collect()
    }

    /// Date-based status of a task as seen on `today`.
    pub fn timeliness(&self, task_id: &str, today: Date) -> Option<Timeliness> {
        let task = self.task(task_id)?;
        let timing = self.timing(task_id)?;
        Some(Timeliness::derive(task.status(), timing, today))
    }

    pub fn duration_summary(&self) -> DurationSummary {
        DurationSummary::compute(
            &self.plan.tasks,
            self.total_duration_days(),
            self.constraints.max_hours_per_day,
        )
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary::from(self)
    }

    /// Returns a snapshot in which `task_id` has status `to`.
    ///
    /// Moving into `in_progress` consults `policy` about unfinished
    /// dependencies. On error the receiver is the authoritative state.
    pub fn set_task_status(
        &self,
        task_id: &str,
        to: TaskStatus,
        now: Timestamp,
        policy: DependencyPolicy,
    ) -> Result<Self> {
        let index = self.index_of(task_id)?;
        let current = &self.plan.tasks[index];
        TaskLifecycle::check_transition(current, to)?;
        if to == TaskStatus::InProgress && current.status() != TaskStatus::InProgress {
            TaskLifecycle::check_ready(current, &self.plan.tasks, policy)?;
        }

        let mut tasks = self.plan.tasks.clone();
        TaskLifecycle::set_status(&mut tasks[index], to, now)?;
        info!(
            "Plan {}: task '{}' {} -> {}",
            self.plan.id,
            task_id,
            current.status(),
            to
        );
        Ok(self.with_tasks(tasks))
    }

    /// Returns a snapshot with `task_id`'s completion flipped.
    ///
    /// Completing a task that has not been started walks through
    /// `in_progress`, so `policy` applies to it as well.
    pub fn toggle_completion(
        &self,
        task_id: &str,
        now: Timestamp,
        policy: DependencyPolicy,
    ) -> Result<Self> {
        let index = self.index_of(task_id)?;
        let current = &self.plan.tasks[index];
        if TaskLifecycle::toggle_path(current.status()).contains(&TaskStatus::InProgress) {
            TaskLifecycle::check_ready(current, &self.plan.tasks, policy)?;
        }

        let mut tasks = self.plan.tasks.clone();
        let status = TaskLifecycle::toggle_completion(&mut tasks[index], now)?;
        info!(
            "Plan {}: task '{}' toggled {} -> {}",
            self.plan.id,
            task_id,
            current.status(),
            status
        );
        Ok(self.with_tasks(tasks))
    }

    fn index_of(&self, task_id: &str) -> Result<usize> {
        self.graph
            .index_of(task_id)
            .ok_or_else(|| PlanError::TaskNotFound {
                plan_id: self.plan.id,
                task: task_id.to_string(),
            })
    }

    fn with_tasks(&self, tasks: Vec<Task>) -> Self {
        let progress = Progress::from_tasks(&tasks);
        Self {
            plan: Plan {
                tasks,
                ..self.plan.clone()
            },
            constraints: self.constraints.clone(),
            graph: Arc::clone(&self.graph),
            schedule: Arc::clone(&self.schedule),
            critical_path: Arc::clone(&self.critical_path),
            progress,
        }
    }
}
