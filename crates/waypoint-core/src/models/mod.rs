//! Data models for goals, plans and tasks.
//!
//! These are the stored records. Everything derived from them (schedule,
//! critical path, progress) is computed by [`crate::PlanModel`]. Display
//! implementations live in [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use waypoint_core::models::{Priority, Task, TaskStatus};
//!
//! let task = Task::new("T2", "Write the parser", 3)
//!     .with_dependencies(["T1"])
//!     .with_priority(Priority::High);
//!
//! assert_eq!(task.status(), TaskStatus::Pending);
//! assert!(!task.is_completed());
//! ```

pub mod goal;
pub mod plan;
pub mod status;
pub mod summary;
pub mod task;


pub use goal::{Constraints, Goal};
pub use plan::{GeneratedPlan, Plan};
pub use status::{PlanType, Priority, TaskStatus};
pub use summary::{GoalSummary, PlanSummary};
pub use task::Task;
