//! Markdown formatting for plans, tasks and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly; the wrappers here
//! add context such as "Created plan with ID: 3" or a reference date for
//! timeliness. The CLI feeds the text to its terminal renderer and the MCP
//! server returns it unchanged.
//!
//! - [`collections`]: [`PlanSummaries`], [`GoalSummaries`] and [`Tasks`]
//! - [`results`]: [`CreateResult`], [`UpdateResult`], [`DeleteResult`]
//! - [`status`]: [`OperationStatus`]
//! - [`datetime`]: [`LocalDateTime`]
//! - [`models`]: `Display` for models and the report wrappers

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{GoalSummaries, PlanSummaries, Tasks};
pub use datetime::LocalDateTime;
pub use models::{CriticalPath, GoalDetails, PlanReport, ScheduledTask};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
