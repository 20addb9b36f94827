//! MCP server for Waypoint
//!
//! Exposes plan import, schedule inspection and task lifecycle changes as
//! Model Context Protocol tools over stdio.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use jiff::civil::Date;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};
use waypoint_core::PlanStore;

pub mod errors;
pub mod handlers;

pub use handlers::{
    CreateGoal, DeletePlan, Id, ImportPlan, ListGoals, ListPlans, McpHandlers, McpResult,
    SetTaskStatus, TaskRef, ToggleTask,
};

const INSTRUCTIONS: &str = r#"Waypoint schedules generated plans with the critical-path method and tracks their progress.

## Core Concepts
- **Plans**: a goal broken into tasks with durations (working days) and dependencies
- **Schedule**: earliest/latest start and finish dates for every task, computed on a working-day calendar that skips weekends and unavailable dates
- **Critical path**: tasks with zero slack; any delay on them delays the whole plan
- **Task status**: pending → in_progress → completed, with blocked as a side state. Completed tasks can only be reopened to pending.

- **Goals**: the objective plans are generated for, with the deadline, daily hours and calendar constraints every plan of the goal is scheduled against. A goal can exist before any plan and keeps existing when its plans are deleted.

## Workflow
1. Import generator output with `import_plan`, or attach it to a goal from `list_goals`/`create_goal` via goal_id
2. Review the plan with `show_plan`, or `plan_schedule` for machine-readable dates
3. Pick work with `actionable_tasks`; it lists tasks whose dependencies are all completed
4. Record progress with `set_task_status` or `toggle_task`
5. Check `critical_path` to see which tasks the finish date depends on

Starting a task whose dependencies are not completed is rejected unless `force` is true."#;

/// MCP server for Waypoint
#[derive(Clone)]
pub struct WaypointMcpServer {
    store: Arc<Mutex<PlanStore>>,
    today: Option<Date>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WaypointMcpServer {
    /// `today` pins the reference date; `None` uses the local date per call.
    pub fn new(store: PlanStore, today: Option<Date>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            today,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> McpHandlers {
        McpHandlers::new(self.store.clone(), self.today)
    }

    #[tool(
        name = "list_plans",
        description = "List stored plans with their schedule window and progress. Pass goal_id to only list plans generated for one goal, and skip/limit to page through the list."
    )]
    async fn list_plans(&self, params: Parameters<ListPlans>) -> McpResult {
        self.handlers().list_plans(params).await
    }

    #[tool(
        name = "list_goals",
        description = "List goals with their deadline and number of plans. Supports skip and limit for paging."
    )]
    async fn list_goals(&self, params: Parameters<ListGoals>) -> McpResult {
        self.handlers().list_goals(params).await
    }

    #[tool(
        name = "show_goal",
        description = "Show a goal with its scheduling constraints and a summary of every plan generated for it."
    )]
    async fn show_goal(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_goal(params).await
    }

    #[tool(
        name = "create_goal",
        description = "Create a goal before any plan exists for it. Constraints: deadline (YYYY-MM-DD), max_hours_per_day (1-24, default 8), work_on_weekends, unavailable_dates. Plans imported with its goal_id are scheduled against these constraints."
    )]
    async fn create_goal(&self, params: Parameters<CreateGoal>) -> McpResult {
        self.handlers().create_goal(params).await
    }

    #[tool(
        name = "show_plan",
        description = "Show a plan as markdown: metadata, critical path, deadline warnings, and every task in dependency order with its scheduled window, slack and whether it is on track today."
    )]
    async fn show_plan(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_plan(params).await
    }

    #[tool(
        name = "plan_schedule",
        description = "Return the computed plan as JSON: tasks with earliest/latest start and finish dates, slack and critical flags, plus progress, duration totals and any deadline overrun."
    )]
    async fn plan_schedule(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().plan_schedule(params).await
    }

    #[tool(
        name = "critical_path",
        description = "List the zero-slack tasks of a plan in order. Delaying any of them delays the estimated completion date."
    )]
    async fn critical_path(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().critical_path(params).await
    }

    #[tool(
        name = "import_plan",
        description = "Import a generated plan from a JSON file on disk (goal_text, constraints, plan_type, plan_summary, tasks). The plan is validated for duplicate ids, unknown dependencies and cycles before it is stored. Optionally attach it to an existing goal_id and choose a start_date (YYYY-MM-DD)."
    )]
    async fn import_plan(&self, params: Parameters<ImportPlan>) -> McpResult {
        self.handlers().import_plan(params).await
    }

    #[tool(
        name = "delete_plan",
        description = "Permanently delete a plan. Requires confirmed=true; this cannot be undone."
    )]
    async fn delete_plan(&self, params: Parameters<DeletePlan>) -> McpResult {
        self.handlers().delete_plan(params).await
    }

    #[tool(
        name = "set_task_status",
        description = "Change a task's status to pending, in_progress, completed or blocked. Only lifecycle transitions are allowed: pending → in_progress/blocked, in_progress → completed/blocked/pending, blocked → pending/in_progress, completed → pending. Starting a task with incomplete dependencies fails unless force=true."
    )]
    async fn set_task_status(&self, params: Parameters<SetTaskStatus>) -> McpResult {
        self.handlers().set_task_status(params).await
    }

    #[tool(
        name = "toggle_task",
        description = "Mark a task completed, or reopen it to pending if it is already completed. A pending or blocked task is moved through in_progress, so its dependencies must be completed unless force=true."
    )]
    async fn toggle_task(&self, params: Parameters<ToggleTask>) -> McpResult {
        self.handlers().toggle_task(params).await
    }

    #[tool(
        name = "show_task",
        description = "Show one task with its scheduled window, slack and timeliness (done, blocked, overdue, behind, on track or upcoming)."
    )]
    async fn show_task(&self, params: Parameters<TaskRef>) -> McpResult {
        self.handlers().show_task(params).await
    }

    #[tool(
        name = "actionable_tasks",
        description = "List the tasks of a plan that can be started now: not yet started or completed, with every dependency completed."
    )]
    async fn actionable_tasks(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().actionable_tasks(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for WaypointMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "waypoint".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: WaypointMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Waypoint MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
