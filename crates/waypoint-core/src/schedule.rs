//! Critical-path scheduling over a [`TaskGraph`].
//!
//! All arithmetic happens in working-day offsets from the plan start; a task
//! with `earliest_start = 2` and `duration_days = 3` occupies offsets 2, 3
//! and 4 and has `earliest_finish = 5`. Offsets are mapped onto calendar
//! dates through a [`WorkCalendar`] only at the end, inclusively: the finish
//! date of a task is the last working day it occupies.

use jiff::civil::Date;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    calendar::WorkCalendar,
    error::{PlanError, Result},
    graph::TaskGraph,
    models::Task,
};

/// Computed timing of one task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskTiming {
    pub earliest_start: i64,
    pub earliest_finish: i64,
    pub latest_start: i64,
    pub latest_finish: i64,
    /// `latest_start - earliest_start`, never negative
    pub slack: i64,
    /// Slack measured against the deadline instead of the project finish.
    /// Negative when the task threatens the deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_slack: Option<i64>,
    pub earliest_start_date: Date,
    pub earliest_finish_date: Date,
    pub latest_start_date: Date,
    pub latest_finish_date: Date,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }
}

/// Raised alongside a schedule whose work cannot fit before the deadline.
///
/// The schedule itself stays valid; this only reports by how much it misses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeadlineInfeasible {
    pub deadline: Date,
    /// Last working day of the project
    pub expected_finish: Date,
    /// Working days of work that fall after the deadline
    pub overrun_days: i64,
}

/// Output of a [`ScheduleEngine`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    start_date: Date,
    timings: Vec<TaskTiming>,
    project_finish: i64,
    total_duration_days: i64,
    estimated_completion: Date,
    deadline_infeasible: Option<DeadlineInfeasible>,
}

impl Schedule {
    /// First working day of the plan (offset 0).
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Timing of the task at `index` in the scheduled task slice.
    pub fn timing(&self, index: usize) -> Option<&TaskTiming> {
        self.timings.get(index)
    }

    /// Timings in the order of the scheduled task slice.
    pub fn timings(&self) -> &[TaskTiming] {
        &self.timings
    }

    /// Offset right after the last task finishes.
    pub fn project_finish(&self) -> i64 {
        self.project_finish
    }

    /// Working days between the earliest root start and the latest finish.
    pub fn total_duration_days(&self) -> i64 {
        self.total_duration_days
    }

    /// Last working day of the plan; the start date for an empty plan.
    pub fn estimated_completion(&self) -> Date {
        self.estimated_completion
    }

    pub fn deadline_infeasible(&self) -> Option<&DeadlineInfeasible> {
        self.deadline_infeasible.as_ref()
    }
}

/// Forward and backward pass of the critical-path method.
///
/// ```rust
/// use jiff::civil::date;
/// use waypoint_core::{models::Task, ScheduleEngine, TaskGraph, WorkCalendar};
///
/// let tasks = vec![
///     Task::new("A", "Design", 2),
///     Task::new("B", "Build", 3).with_dependencies(["A"]),
/// ];
/// let graph = TaskGraph::build(&tasks).unwrap();
/// let calendar = WorkCalendar::every_day();
/// let schedule = ScheduleEngine::new(&calendar)
///     .run(&graph, &tasks, date(2024, 1, 15))
///     .unwrap();
///
/// assert_eq!(schedule.total_duration_days(), 5);
/// assert_eq!(schedule.estimated_completion(), date(2024, 1, 19));
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleEngine<'a> {
    calendar: &'a WorkCalendar,
    deadline: Option<Date>,
}

impl<'a> ScheduleEngine<'a> {
    pub fn new(calendar: &'a WorkCalendar) -> Self {
        Self {
            calendar,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Date>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Schedules `tasks` starting on the first working day on or after
    /// `reference_date`.
    ///
    /// `tasks` must be the slice `graph` was built from.
    pub fn run(&self, graph: &TaskGraph, tasks: &[Task], reference_date: Date) -> Result<Schedule> {
        if graph.len() != tasks.len() {
            return Err(PlanError::invalid_input("tasks").with_reason(format!(
                "graph has {} tasks but {} were given",
                graph.len(),
                tasks.len()
            )));
        }

        let n = tasks.len();
        let durations: Vec<i64> = tasks.iter().map(|t| i64::from(t.duration_days)).collect();

        let mut earliest_start = vec![0_i64; n];
        let mut earliest_finish = vec![0_i64; n];
        for &node in graph.order_indices() {
            earliest_start[node] = graph
                .predecessor_indices(node)
                .iter()
                .map(|&p| earliest_finish[p])
                .max()
                .unwrap_or(0);
            earliest_finish[node] = earliest_start[node] + durations[node];
        }

        let project_finish = earliest_finish.iter().copied().max().unwrap_or(0);

        let mut latest_start = vec![0_i64; n];
        let mut latest_finish = vec![0_i64; n];
        for &node in graph.order_indices().iter().rev() {
            latest_finish[node] = graph
                .successor_indices(node)
                .iter()
                .map(|&s| latest_start[s])
                .min()
                .unwrap_or(project_finish);
            latest_start[node] = latest_finish[node] - durations[node];
        }

        let first_start = (0..n)
            .filter(|&i| graph.predecessor_indices(i).is_empty())
            .map(|i| earliest_start[i])
            .min()
            .unwrap_or(0);
        let total_duration_days = project_finish - first_start;

        let start_date = self.calendar.next_work_day(reference_date)?;
        let day_count = usize::try_from(project_finish).unwrap_or(0);
        let days = self.calendar.work_days(start_date, day_count)?;
        let day = |offset: i64| -> Result<Date> {
            usize::try_from(offset)
                .ok()
                .and_then(|i| days.get(i).copied())
                .ok_or_else(|| PlanError::Configuration {
                    message: format!("offset {offset} is outside the {day_count}-day schedule"),
                })
        };

        let estimated_completion = if project_finish > 0 {
            day(project_finish - 1)?
        } else {
            start_date
        };

        let (margin, deadline_infeasible) = match self.deadline {
            Some(deadline) => {
                let capacity = self.calendar.count_work_days(start_date, deadline)?;
                let margin = capacity - project_finish;
                let infeasible = (margin < 0).then_some(DeadlineInfeasible {
                    deadline,
                    expected_finish: estimated_completion,
                    overrun_days: -margin,
                });
                (Some(margin), infeasible)
            }
            None => (None, None),
        };

        let mut timings = Vec::with_capacity(n);
        for node in 0..n {
            let slack = latest_start[node] - earliest_start[node];
            timings.push(TaskTiming {
                earliest_start: earliest_start[node],
                earliest_finish: earliest_finish[node],
                latest_start: latest_start[node],
                latest_finish: latest_finish[node],
                slack,
                deadline_slack: margin.map(|m| slack + m),
                earliest_start_date: day(earliest_start[node])?,
                earliest_finish_date: day(earliest_finish[node] - 1)?,
                latest_start_date: day(latest_start[node])?,
                latest_finish_date: day(latest_finish[node] - 1)?,
            });
        }

        debug!(
            "Scheduled {n} tasks from {start_date}: {total_duration_days} working days, finishing {estimated_completion}"
        );

        Ok(Schedule {
            start_date,
            timings,
            project_finish,
            total_duration_days,
            estimated_completion,
            deadline_infeasible,
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn task(id: &str, duration: u32, deps: &[&str]) -> Task {
        Task::new(id, format!("Task {id}"), duration).with_dependencies(deps.iter().copied())
    }

    fn run(tasks: &[Task], calendar: &WorkCalendar, deadline: Option<Date>) -> Schedule {
        let graph = TaskGraph::build(tasks).unwrap();
        ScheduleEngine::new(calendar)
            .with_deadline(deadline)
            .run(&graph, tasks, date(2024, 1, 15))
            .unwrap()
    }

    #[test]
    fn test_forward_and_backward_pass() {
        let tasks = vec![task("A", 2, &[]), task("B", 3, &["A"]), task("C", 1, &["A"])];
        let schedule = run(&tasks, &WorkCalendar::every_day(), None);

        let a = schedule.timing(0).unwrap();
        let b = schedule.timing(1).unwrap();
        let c = schedule.timing(2).unwrap();

        assert_eq!((a.earliest_start, a.earliest_finish), (0, 2));
        assert_eq!((b.earliest_start, b.earliest_finish), (2, 5));
        assert_eq!((c.earliest_start, c.earliest_finish), (2, 3));
        assert_eq!(c.latest_finish, 5);
        assert_eq!(c.slack, 2);
        assert_eq!(a.slack, 0);
        assert_eq!(b.slack, 0);
        assert_eq!(schedule.total_duration_days(), 5);
        assert!(schedule.deadline_infeasible().is_none());
    }

    #[test]
    fn test_dates_are_inclusive_working_days() {
        let tasks = vec![task("A", 2, &[]), task("B", 3, &["A"])];
        let schedule = run(&tasks, &WorkCalendar::every_day(), None);

        let a = schedule.timing(0).unwrap();
        let b = schedule.timing(1).unwrap();
        assert_eq!(a.earliest_start_date, date(2024, 1, 15));
        assert_eq!(a.earliest_finish_date, date(2024, 1, 16));
        assert_eq!(b.earliest_start_date, date(2024, 1, 17));
        assert_eq!(b.latest_finish_date, date(2024, 1, 19));
        assert_eq!(schedule.estimated_completion(), date(2024, 1, 19));
    }

    #[test]
    fn test_weekends_do_not_consume_duration() {
        // 2024-01-18 is a Thursday
        let tasks = vec![task("A", 3, &[])];
        let graph = TaskGraph::build(&tasks).unwrap();
        let calendar = WorkCalendar::new(true, []);
        let schedule = ScheduleEngine::new(&calendar)
            .run(&graph, &tasks, date(2024, 1, 18))
            .unwrap();

        assert_eq!(schedule.total_duration_days(), 3);
        assert_eq!(schedule.estimated_completion(), date(2024, 1, 22));
    }

    #[test]
    fn test_start_moves_to_first_working_day() {
        let tasks = vec![task("A", 1, &[])];
        let graph = TaskGraph::build(&tasks).unwrap();
        let calendar = WorkCalendar::new(true, [date(2024, 1, 22)]);
        let schedule = ScheduleEngine::new(&calendar)
            .run(&graph, &tasks, date(2024, 1, 20))
            .unwrap();

        assert_eq!(schedule.start_date(), date(2024, 1, 23));
        assert_eq!(schedule.estimated_completion(), date(2024, 1, 23));
    }

    #[test]
    fn test_missed_deadline_is_reported_not_raised() {
        let tasks = vec![task("A", 2, &[]), task("B", 3, &["A"]), task("C", 1, &["A"])];
        let schedule = run(&tasks, &WorkCalendar::every_day(), Some(date(2024, 1, 18)));

        let infeasible = schedule.deadline_infeasible().unwrap();
        assert_eq!(infeasible.overrun_days, 1);
        assert_eq!(infeasible.expected_finish, date(2024, 1, 19));
        assert_eq!(schedule.timing(0).unwrap().deadline_slack, Some(-1));
        assert_eq!(schedule.timing(2).unwrap().deadline_slack, Some(1));
        assert!(schedule.timings().iter().all(|t| t.slack >= 0));
    }

    #[test]
    fn test_deadline_on_last_working_day_is_met() {
        let tasks = vec![task("A", 5, &[])];
        let schedule = run(&tasks, &WorkCalendar::every_day(), Some(date(2024, 1, 19)));
        assert!(schedule.deadline_infeasible().is_none());
        assert_eq!(schedule.timing(0).unwrap().deadline_slack, Some(0));
    }

    #[test]
    fn test_parallel_equal_branches_are_both_critical() {
        let tasks = vec![task("A", 2, &[]), task("B", 2, &[]), task("C", 1, &["A", "B"])];
        let schedule = run(&tasks, &WorkCalendar::every_day(), None);
        assert!(schedule.timings().iter().all(TaskTiming::is_critical));
    }

    #[test]
    fn test_empty_plan_has_zero_duration() {
        let schedule = run(&[], &WorkCalendar::every_day(), Some(date(2024, 1, 1)));
        assert_eq!(schedule.total_duration_days(), 0);
        assert_eq!(schedule.estimated_completion(), date(2024, 1, 15));
        assert!(schedule.deadline_infeasible().is_none());
    }

    #[test]
    fn test_mismatched_task_slice_is_rejected() {
        let tasks = vec![task("A", 1, &[])];
        let graph = TaskGraph::build(&tasks).unwrap();
        let calendar = WorkCalendar::every_day();
        let result = ScheduleEngine::new(&calendar).run(&graph, &[], date(2024, 1, 15));
        assert!(matches!(result, Err(PlanError::InvalidInput { .. })));
    }
}
