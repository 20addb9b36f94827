//! Task status state machine.
//!
//! | From        | Allowed targets              |
//! |-------------|------------------------------|
//! | pending     | in_progress, blocked         |
//! | in_progress | completed, blocked, pending  |
//! | blocked     | pending, in_progress         |
//! | completed   | pending                      |
//!
//! [`TaskLifecycle::set_status`] is the only way a task's status changes.
//! It keeps `completed_at` in step with the status.

use std::fmt;

use jiff::{civil::Date, Timestamp};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlanError, Result},
    models::{Task, TaskStatus},
    schedule::TaskTiming,
};

/// What to do when a task is started before its dependencies are done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyPolicy {
    /// Reject the change
    #[default]
    Enforce,
    /// Log a warning and apply the change
    Warn,
    /// Apply the change silently
    Ignore,
}

/// Transition rules and side effects for task statuses.
pub struct TaskLifecycle;

impl TaskLifecycle {
    /// Whether `from -> to` is an edge of the state machine.
    pub fn can_transition(from: TaskStatus, to: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (from, to),
            (Pending, InProgress | Blocked)
                | (InProgress, Completed | Blocked | Pending)
                | (Blocked, Pending | InProgress)
                | (Completed, Pending)
        )
    }

    /// Statuses reachable from `from` in one step.
    pub fn allowed_targets(from: TaskStatus) -> Vec<TaskStatus> {
        TaskStatus::ALL
            .into_iter()
            .filter(|&to| Self::can_transition(from, to))
            .collect()
    }

    /// Moves `task` to `to`.
    ///
    /// Setting the current status again is a no-op. Entering `completed`
    /// stamps `completed_at` with `now`; leaving it clears the stamp.
    pub fn set_status(task: &mut Task, to: TaskStatus, now: Timestamp) -> Result<()> {
        if task.status() == to {
            return Ok(());
        }
        Self::check_transition(task, to)?;
        task.apply_status(to, now);
        Ok(())
    }

    /// Fails with `InvalidTransition` unless `task` may move to `to`.
    ///
    /// Staying in the current status always passes.
    pub fn check_transition(task: &Task, to: TaskStatus) -> Result<()> {
        let from = task.status();
        if from == to || Self::can_transition(from, to) {
            return Ok(());
        }
        Err(PlanError::InvalidTransition {
            task: task.task_id.clone(),
            from,
            to,
        })
    }

    /// The steps a completion toggle walks from `from`.
    ///
    /// A completed task reopens to pending; anything else is driven to
    /// completed through `in_progress` when there is no direct edge.
    pub fn toggle_path(from: TaskStatus) -> &'static [TaskStatus] {
        match from {
            TaskStatus::Completed => &[TaskStatus::Pending],
            TaskStatus::InProgress => &[TaskStatus::Completed],
            TaskStatus::Pending | TaskStatus::Blocked => {
                &[TaskStatus::InProgress, TaskStatus::Completed]
            }
        }
    }

    /// Flips a task between completed and not completed.
    ///
    /// Either the whole path applies or the task is left untouched.
    pub fn toggle_completion(task: &mut Task, now: Timestamp) -> Result<TaskStatus> {
        let mut next = task.clone();
        for &step in Self::toggle_path(task.status()) {
            Self::set_status(&mut next, step, now)?;
        }
        *task = next;
        Ok(task.status())
    }

    /// Ids of `task`'s dependencies in `tasks` that are not completed yet.
    pub fn pending_dependencies(task: &Task, tasks: &[Task]) -> Vec<String> {
        task.depends_on
            .iter()
            .filter(|dep| {
                !tasks
                    .iter()
                    .any(|other| other.task_id == **dep && other.is_completed())
            })
            .cloned()
            .collect()
    }

    /// Whether every dependency of `task` is completed.
    pub fn is_ready(task: &Task, tasks: &[Task]) -> bool {
        Self::pending_dependencies(task, tasks).is_empty()
    }

    /// Applies `policy` to a start of `task`.
    pub fn check_ready(task: &Task, tasks: &[Task], policy: DependencyPolicy) -> Result<()> {
        let pending = Self::pending_dependencies(task, tasks);
        if pending.is_empty() {
            return Ok(());
        }
        match policy {
            DependencyPolicy::Enforce => Err(PlanError::DependencyNotSatisfied {
                task: task.task_id.clone(),
                pending,
            }),
            DependencyPolicy::Warn => {
                warn!(
                    "Starting task '{}' before dependencies {} are completed",
                    task.task_id,
                    pending.join(", ")
                );
                Ok(())
            }
            DependencyPolicy::Ignore => Ok(()),
        }
    }
}

/// Date-based display status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeliness {
    /// Completed
    Done,
    /// Blocked, whatever the date
    Blocked,
    /// Not completed and past its latest finish date
    Overdue,
    /// Still pending after its latest start date
    Behind,
    /// Within its scheduled window
    OnTrack,
    /// Pending and not scheduled to start yet
    Upcoming,
}

impl Timeliness {
    pub fn derive(status: TaskStatus, timing: &TaskTiming, today: Date) -> Self {
        match status {
            TaskStatus::Completed => Timeliness::Done,
            TaskStatus::Blocked => Timeliness::Blocked,
            _ if today > timing.latest_finish_date => Timeliness::Overdue,
            TaskStatus::Pending if today > timing.latest_start_date => Timeliness::Behind,
            TaskStatus::Pending if today < timing.earliest_start_date => Timeliness::Upcoming,
            _ => Timeliness::OnTrack,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeliness::Done => "done",
            Timeliness::Blocked => "blocked",
            Timeliness::Overdue => "overdue",
            Timeliness::Behind => "behind",
            Timeliness::OnTrack => "on track",
            Timeliness::Upcoming => "upcoming",
        }
    }

    /// Whether the task needs attention today.
    pub fn is_late(&self) -> bool {
        matches!(self, Timeliness::Overdue | Timeliness::Behind)
    }
}

impl fmt::Display for Timeliness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn now() -> Timestamp {
        Timestamp::from_second(1_705_312_800).unwrap() // 2024-01-15 10:00:00 UTC
    }

    fn task_in(status: TaskStatus) -> Task {
        let mut task = Task::new("T1", "Build", 2);
        for &step in match status {
            TaskStatus::Pending => &[][..],
            TaskStatus::InProgress => &[TaskStatus::InProgress][..],
            TaskStatus::Completed => &[TaskStatus::InProgress, TaskStatus::Completed][..],
            TaskStatus::Blocked => &[TaskStatus::Blocked][..],
        } {
            TaskLifecycle::set_status(&mut task, step, now()).unwrap();
        }
        task
    }

    #[test]
    fn test_transition_table() {
        use TaskStatus::*;
        assert_eq!(TaskLifecycle::allowed_targets(Pending), vec![InProgress, Blocked]);
        assert_eq!(
            TaskLifecycle::allowed_targets(InProgress),
            vec![Pending, Completed, Blocked]
        );
        assert_eq!(TaskLifecycle::allowed_targets(Blocked), vec![Pending, InProgress]);
        assert_eq!(TaskLifecycle::allowed_targets(Completed), vec![Pending]);
    }

    #[test]
    fn test_completing_stamps_completed_at() {
        let task = task_in(TaskStatus::Completed);
        assert!(task.is_completed());
        assert_eq!(task.completed_at(), Some(now()));
    }

    #[test]
    fn test_completed_to_in_progress_is_rejected() {
        let mut task = task_in(TaskStatus::Completed);
        let err = TaskLifecycle::set_status(&mut task, TaskStatus::InProgress, now()).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidTransition {
                from: TaskStatus::Completed,
                to: TaskStatus::InProgress,
                ..
            }
        ));
        assert_eq!(task.status(), TaskStatus::Completed);
        assert!(task.completed_at().is_some());
    }

    #[test]
    fn test_check_transition_matches_table() {
        for from in TaskStatus::ALL {
            let task = task_in(from);
            for to in TaskStatus::ALL {
                let allowed = from == to || TaskLifecycle::can_transition(from, to);
                assert_eq!(TaskLifecycle::check_transition(&task, to).is_ok(), allowed);
            }
        }
    }

    #[test]
    fn test_reopening_clears_completed_at() {
        let mut task = task_in(TaskStatus::Completed);
        TaskLifecycle::set_status(&mut task, TaskStatus::Pending, now()).unwrap();
        assert_eq!(task.status(), TaskStatus::Pending);
        assert!(!task.is_completed());
        assert!(task.completed_at().is_none());
    }

    #[test]
    fn test_same_status_is_a_no_op() {
        let mut task = task_in(TaskStatus::Completed);
        let later = Timestamp::from_second(1_705_399_200).unwrap();
        TaskLifecycle::set_status(&mut task, TaskStatus::Completed, later).unwrap();
        assert_eq!(task.completed_at(), Some(now()));
    }

    #[test]
    fn test_toggle_walks_through_in_progress() {
        let mut task = task_in(TaskStatus::Pending);
        assert_eq!(
            TaskLifecycle::toggle_completion(&mut task, now()).unwrap(),
            TaskStatus::Completed
        );
        assert!(task.completed_at().is_some());

        assert_eq!(
            TaskLifecycle::toggle_completion(&mut task, now()).unwrap(),
            TaskStatus::Pending
        );
        assert!(task.completed_at().is_none());

        let mut blocked = task_in(TaskStatus::Blocked);
        TaskLifecycle::toggle_completion(&mut blocked, now()).unwrap();
        assert!(blocked.is_completed());
    }

    #[test]
    fn test_readiness_policies() {
        let tasks = vec![
            task_in(TaskStatus::Completed),
            Task::new("T2", "Review", 1),
            Task::new("T3", "Ship", 1).with_dependencies(["T1", "T2"]),
        ];
        let ship = &tasks[2];

        assert_eq!(TaskLifecycle::pending_dependencies(ship, &tasks), vec!["T2"]);
        assert!(!TaskLifecycle::is_ready(ship, &tasks));
        match TaskLifecycle::check_ready(ship, &tasks, DependencyPolicy::Enforce) {
            Err(PlanError::DependencyNotSatisfied { task, pending }) => {
                assert_eq!(task, "T3");
                assert_eq!(pending, vec!["T2"]);
            }
            other => panic!("expected dependency error, got {other:?}"),
        }
        assert!(TaskLifecycle::check_ready(ship, &tasks, DependencyPolicy::Warn).is_ok());
        assert!(TaskLifecycle::check_ready(ship, &tasks, DependencyPolicy::Ignore).is_ok());
        assert!(TaskLifecycle::is_ready(&tasks[1], &tasks));
    }

    fn timing() -> TaskTiming {
        TaskTiming {
            earliest_start: 2,
            earliest_finish: 4,
            latest_start: 3,
            latest_finish: 5,
            slack: 1,
            deadline_slack: None,
            earliest_start_date: date(2024, 1, 17),
            earliest_finish_date: date(2024, 1, 18),
            latest_start_date: date(2024, 1, 18),
            latest_finish_date: date(2024, 1, 19),
        }
    }

    #[test]
    fn test_timeliness() {
        use TaskStatus::*;
        let t = timing();
        assert_eq!(Timeliness::derive(Pending, &t, date(2024, 1, 16)), Timeliness::Upcoming);
        assert_eq!(Timeliness::derive(Pending, &t, date(2024, 1, 17)), Timeliness::OnTrack);
        assert_eq!(Timeliness::derive(Pending, &t, date(2024, 1, 19)), Timeliness::Behind);
        assert_eq!(Timeliness::derive(InProgress, &t, date(2024, 1, 19)), Timeliness::OnTrack);
        assert_eq!(Timeliness::derive(InProgress, &t, date(2024, 1, 20)), Timeliness::Overdue);
        assert_eq!(Timeliness::derive(Blocked, &t, date(2024, 1, 20)), Timeliness::Blocked);
        assert_eq!(Timeliness::derive(Completed, &t, date(2024, 2, 1)), Timeliness::Done);
        assert!(Timeliness::Behind.is_late());
        assert!(!Timeliness::Upcoming.is_late());
    }
}
