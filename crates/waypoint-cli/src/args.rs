//! Command-line argument definitions.
//!
//! Each clap `Args` struct converts into the matching core parameter type
//! with `From`, so clap attributes never leak into `waypoint-core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → operations
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use waypoint_core::params::{
    CreateGoal, DeletePlan, Id, ImportPlan, ListGoals, ListPlans, SetTaskStatus, TaskRef,
    ToggleTask,
};

/// Dependency-aware planning from the command line
///
/// Waypoint imports generated plans, schedules their tasks on a working-day
/// calendar with the critical-path method, and tracks progress as tasks are
/// started and completed. `wp serve` exposes the same operations to AI
/// assistants over MCP.
#[derive(Parser)]
#[command(version, about, name = "wp")]
pub struct Args {
    /// Directory holding plan documents. Defaults to
    /// $XDG_DATA_HOME/waypoint/plans
    #[arg(long, global = true)]
    pub plans_dir: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Reference date (YYYY-MM-DD) for timeliness and default start dates.
    /// Defaults to the local date.
    #[arg(long, global = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create and inspect goals
    #[command(alias = "g")]
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Import, inspect and delete plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Change and inspect tasks within a plan
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Start the MCP server on stdio
    Serve,
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a goal to attach plans to
    #[command(alias = "c")]
    Create(CreateGoalArgs),
    /// List goals
    #[command(aliases = ["l", "ls"])]
    List(PageArgs),
    /// Show a goal with its plans
    #[command(alias = "s")]
    Show(GoalIdArgs),
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Import a generated plan from a JSON file
    #[command(alias = "i")]
    Import(ImportPlanArgs),
    /// List stored plans
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Show a plan with its schedule
    #[command(alias = "s")]
    Show(ShowPlanArgs),
    /// Show the critical path of a plan
    #[command(alias = "cp")]
    Critical(PlanIdArgs),
    /// Delete a plan
    #[command(aliases = ["d", "rm"])]
    Delete(DeletePlanArgs),
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Set a task's status
    #[command(alias = "st")]
    Status(SetStatusArgs),
    /// Complete a task, or reopen it if already completed
    #[command(alias = "x")]
    Toggle(ToggleTaskArgs),
    /// Show a task with its schedule
    #[command(alias = "s")]
    Show(TaskRefArgs),
    /// List tasks that can be started now
    #[command(alias = "r")]
    Ready(PlanIdArgs),
}

#[derive(ClapArgs)]
pub struct CreateGoalArgs {
    /// What you want to achieve
    pub goal_text: String,
    /// Date the work should be done by (YYYY-MM-DD)
    #[arg(long)]
    pub deadline: Option<String>,
    /// Working hours available per day (1-24)
    #[arg(long = "max-hours")]
    pub max_hours_per_day: Option<u8>,
    /// Count Saturdays and Sundays as working days
    #[arg(long = "weekends")]
    pub work_on_weekends: bool,
    /// A date on which no work happens; repeat for several
    #[arg(long = "unavailable")]
    pub unavailable_dates: Vec<String>,
}

impl From<CreateGoalArgs> for CreateGoal {
    fn from(val: CreateGoalArgs) -> Self {
        CreateGoal {
            goal_text: val.goal_text,
            deadline: val.deadline,
            max_hours_per_day: val.max_hours_per_day,
            work_on_weekends: val.work_on_weekends,
            unavailable_dates: val.unavailable_dates,
        }
    }
}

#[derive(ClapArgs)]
pub struct GoalIdArgs {
    /// ID of the goal
    pub id: u64,
}

impl From<GoalIdArgs> for Id {
    fn from(val: GoalIdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(ClapArgs)]
pub struct PageArgs {
    /// Number of entries to skip
    #[arg(long, default_value_t = 0)]
    pub skip: usize,
    /// Maximum number of entries to show
    #[arg(long)]
    pub limit: Option<usize>,
}

impl From<PageArgs> for ListGoals {
    fn from(val: PageArgs) -> Self {
        ListGoals {
            skip: val.skip,
            limit: val.limit,
        }
    }
}

#[derive(ClapArgs)]
pub struct ImportPlanArgs {
    /// Path to the generator's JSON output
    pub path: PathBuf,
    /// Attach the plan to an existing goal
    #[arg(long = "goal")]
    pub goal_id: Option<u64>,
    /// First day the schedule may use (YYYY-MM-DD)
    #[arg(long = "start")]
    pub start_date: Option<String>,
}

impl From<ImportPlanArgs> for ImportPlan {
    fn from(val: ImportPlanArgs) -> Self {
        ImportPlan {
            path: val.path.display().to_string(),
            goal_id: val.goal_id,
            start_date: val.start_date,
        }
    }
}

#[derive(ClapArgs)]
pub struct ListPlansArgs {
    /// Only list plans for this goal
    #[arg(long = "goal")]
    pub goal_id: Option<u64>,
    #[command(flatten)]
    pub page: PageArgs,
}

impl From<ListPlansArgs> for ListPlans {
    fn from(val: ListPlansArgs) -> Self {
        ListPlans {
            goal_id: val.goal_id,
            skip: val.page.skip,
            limit: val.page.limit,
        }
    }
}

#[derive(ClapArgs)]
pub struct ShowPlanArgs {
    /// ID of the plan to show
    pub id: u64,
    /// Print the computed plan as JSON instead of markdown
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs)]
pub struct PlanIdArgs {
    /// ID of the plan
    pub id: u64,
}

impl From<PlanIdArgs> for Id {
    fn from(val: PlanIdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(ClapArgs)]
pub struct DeletePlanArgs {
    /// ID of the plan to delete
    pub id: u64,
    /// Confirm the deletion; it cannot be undone
    #[arg(long)]
    pub confirm: bool,
}

impl From<DeletePlanArgs> for DeletePlan {
    fn from(val: DeletePlanArgs) -> Self {
        DeletePlan {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

#[derive(ClapArgs)]
pub struct TaskRefArgs {
    /// ID of the plan containing the task
    pub plan_id: u64,
    /// Task id such as T1
    pub task_id: String,
}

impl From<TaskRefArgs> for TaskRef {
    fn from(val: TaskRefArgs) -> Self {
        TaskRef {
            plan_id: val.plan_id,
            task_id: val.task_id,
        }
    }
}

#[derive(ClapArgs)]
pub struct SetStatusArgs {
    /// ID of the plan containing the task
    pub plan_id: u64,
    /// Task id such as T1
    pub task_id: String,
    /// New status: pending, in_progress, completed or blocked
    pub status: String,
    /// Start the task even if its dependencies are not completed
    #[arg(long)]
    pub force: bool,
}

impl From<SetStatusArgs> for SetTaskStatus {
    fn from(val: SetStatusArgs) -> Self {
        SetTaskStatus {
            plan_id: val.plan_id,
            task_id: val.task_id,
            status: val.status,
            force: val.force,
        }
    }
}

#[derive(ClapArgs)]
pub struct ToggleTaskArgs {
    /// ID of the plan containing the task
    pub plan_id: u64,
    /// Task id such as T1
    pub task_id: String,
    /// Complete the task even if its dependencies are not completed
    #[arg(long)]
    pub force: bool,
}

impl From<ToggleTaskArgs> for ToggleTask {
    fn from(val: ToggleTaskArgs) -> Self {
        ToggleTask {
            plan_id: val.plan_id,
            task_id: val.task_id,
            force: val.force,
        }
    }
}
