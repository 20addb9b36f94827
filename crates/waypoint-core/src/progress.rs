//! Completion and duration aggregates.
//!
//! Both are pure functions of the task list and never look at the schedule,
//! so a status change only has to recompute these.

use serde::{Deserialize, Serialize};

use crate::models::{Task, TaskStatus};

/// Per-status counts and the completion percentage of a plan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub blocked: usize,
    pub pending: usize,
    /// `round(100 * completed / total)`, 0 for an empty plan
    pub percent: u8,
}

impl Progress {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut progress = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            match task.status() {
                TaskStatus::Completed => progress.completed += 1,
                TaskStatus::InProgress => progress.in_progress += 1,
                TaskStatus::Blocked => progress.blocked += 1,
                TaskStatus::Pending => progress.pending += 1,
            }
        }
        progress.percent = percent(progress.completed, progress.total);
        progress
    }

    /// Whether every task is completed. False for an empty plan.
    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Rounds half up, in integer arithmetic.
fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * part + total) / (2 * total);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

/// How much work a plan holds and how much is left.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DurationSummary {
    /// Sum of all task durations, ignoring parallelism
    pub total_task_days: u64,
    /// Length of the critical path in working days
    pub critical_path_days: i64,
    /// Sum of durations of tasks that are not completed
    pub remaining_task_days: u64,
    /// Remaining task days at the daily hour limit
    pub remaining_hours: u64,
}

impl DurationSummary {
    pub fn compute(tasks: &[Task], critical_path_days: i64, max_hours_per_day: u8) -> Self {
        let total_task_days = tasks.iter().map(|t| u64::from(t.duration_days)).sum();
        let remaining_task_days: u64 = tasks
            .iter()
            .filter(|t| !t.is_completed())
            .map(|t| u64::from(t.duration_days))
            .sum();
        Self {
            total_task_days,
            critical_path_days,
            remaining_task_days,
            remaining_hours: remaining_task_days * u64::from(max_hours_per_day),
        }
    }
}
