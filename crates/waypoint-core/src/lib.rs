//! Core library for the Waypoint task scheduler.
//!
//! Waypoint turns a goal's generated plan (tasks with durations and
//! dependencies) into a dated schedule: it validates the dependency graph,
//! runs the critical-path method over a working-day calendar, and tracks
//! progress as tasks move through their lifecycle.
//!
//! The pieces, bottom-up:
//!
//! - [`TaskGraph`]: validated dependency graph with a stable topological order
//! - [`WorkCalendar`] and [`ScheduleEngine`]: forward and backward passes
//! - [`critical_path`]: zero-slack tasks
//! - [`Progress`] and [`DurationSummary`]: completion and effort figures
//! - [`TaskLifecycle`]: the status state machine
//! - [`PlanModel`]: an immutable snapshot tying all of the above together
//!
//! [`PlanStore`] persists plans as JSON documents and [`operations`] holds the
//! workflows shared by the CLI and the MCP server.
//!
//! # Quick Start
//!
//! ```rust
//! use jiff::{civil::date, Timestamp};
//! use waypoint_core::{
//!     models::{Constraints, Plan, PlanType, Task, TaskStatus},
//!     DependencyPolicy, PlanModel,
//! };
//!
//! let plan = Plan {
//!     id: 1,
//!     goal_id: 1,
//!     plan_type: PlanType::Aggressive,
//!     plan_summary: "Publish the paper".to_string(),
//!     start_date: date(2024, 1, 15),
//!     tasks: vec![
//!         Task::new("T1", "Run experiments", 3),
//!         Task::new("T2", "Write draft", 2).with_dependencies(["T1"]),
//!         Task::new("T3", "Make figures", 1).with_dependencies(["T1"]),
//!     ],
//!     created_at: Timestamp::UNIX_EPOCH,
//! };
//!
//! let model = PlanModel::build(plan, Constraints::default())?;
//! assert_eq!(model.critical_path(), ["T1", "T2"]);
//! assert_eq!(model.estimated_completion(), date(2024, 1, 19));
//!
//! let model = model.toggle_completion("T1", Timestamp::now(), DependencyPolicy::Enforce)?;
//! assert_eq!(model.task("T1").unwrap().status(), TaskStatus::Completed);
//! assert_eq!(model.progress().percent, 33);
//! # Ok::<(), waypoint_core::PlanError>(())
//! ```

pub mod calendar;
pub mod critical;
pub mod display;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod models;
pub mod operations;
pub mod params;
pub mod plan_model;
pub mod progress;
pub mod schedule;
pub mod store;
pub mod view;

pub use calendar::WorkCalendar;
pub use critical::critical_path;
pub use display::{
    CreateResult, CriticalPath, DeleteResult, GoalDetails, GoalSummaries, LocalDateTime,
    OperationStatus, PlanReport, PlanSummaries, ScheduledTask, Tasks, UpdateResult,
};
pub use error::{PlanError, Result};
pub use graph::TaskGraph;
pub use lifecycle::{DependencyPolicy, TaskLifecycle, Timeliness};
pub use plan_model::PlanModel;
pub use progress::{DurationSummary, Progress};
pub use schedule::{DeadlineInfeasible, Schedule, ScheduleEngine, TaskTiming};
pub use store::{PlanDocument, PlanStore, PlanStoreBuilder};
pub use view::{PlanView, TaskView};
