//! Command handlers for the `wp` binary.
//!
//! Every handler converts its clap arguments into core parameters, runs the
//! shared workflow from [`waypoint_core::operations`] and renders the
//! markdown result.

use anyhow::{Context, Result};
use jiff::{civil::Date, Timestamp};
use log::debug;
use waypoint_core::{
    display::{CreateResult, CriticalPath, DeleteResult, OperationStatus, PlanReport, ScheduledTask},
    operations,
    params::{
        CreateGoal, DeletePlan, Id, ImportPlan, ListGoals, ListPlans, SetTaskStatus, TaskRef,
        ToggleTask,
    },
    PlanError, PlanStore,
};

use crate::{
    args::{GoalCommands, PlanCommands, TaskCommands},
    renderer::TerminalRenderer,
};

pub struct Cli {
    store: PlanStore,
    renderer: TerminalRenderer,
    today: Date,
}

impl Cli {
    pub fn new(store: PlanStore, renderer: TerminalRenderer, today: Date) -> Self {
        Self {
            store,
            renderer,
            today,
        }
    }

    pub async fn handle_goal_command(&self, command: GoalCommands) -> Result<()> {
        match command {
            GoalCommands::Create(args) => self.create_goal(&args.into()).await,
            GoalCommands::List(args) => self.list_goals(&args.into()).await,
            GoalCommands::Show(args) => self.show_goal(&args.into()).await,
        }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Import(args) => self.import_plan(&args.into()).await,
            PlanCommands::List(args) => self.list_plans(&args.into()).await,
            PlanCommands::Show(args) => self.show_plan(args.id, args.json).await,
            PlanCommands::Critical(args) => self.critical_path(&args.into()).await,
            PlanCommands::Delete(args) => self.delete_plan(&args.into()).await,
        }
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Status(args) => self.set_task_status(&args.into()).await,
            TaskCommands::Toggle(args) => self.toggle_task(&args.into()).await,
            TaskCommands::Show(args) => self.show_task(&args.into()).await,
            TaskCommands::Ready(args) => self.ready_tasks(&args.into()).await,
        }
    }

    pub async fn list_plans(&self, params: &ListPlans) -> Result<()> {
        let summaries = operations::list_summaries(&self.store, params)
            .await
            .context("Failed to list plans")?;
        let title = match params.goal_id {
            Some(goal) => format!("# Plans for goal {goal}\n\n"),
            None => "# Plans\n\n".to_string(),
        };
        self.renderer.render(&format!("{title}{summaries}"));
        Ok(())
    }

    async fn create_goal(&self, params: &CreateGoal) -> Result<()> {
        debug!("create_goal: {params:?}");
        let goal = operations::create_goal(&self.store, params, Timestamp::now())
            .await
            .context("Failed to create goal")?;
        self.renderer.render(&CreateResult::new(goal).to_string());
        Ok(())
    }

    async fn list_goals(&self, params: &ListGoals) -> Result<()> {
        let summaries = operations::list_goals(&self.store, params)
            .await
            .context("Failed to list goals")?;
        self.renderer.render(&format!("# Goals\n\n{summaries}"));
        Ok(())
    }

    async fn show_goal(&self, params: &Id) -> Result<()> {
        let details = operations::show_goal(&self.store, params.id)
            .await
            .with_context(|| format!("Failed to show goal {}", params.id))?;
        self.renderer.render(&details.to_string());
        Ok(())
    }

    async fn import_plan(&self, params: &ImportPlan) -> Result<()> {
        let model = operations::import_plan(&self.store, params, self.today, Timestamp::now())
            .await
            .with_context(|| format!("Failed to import plan from '{}'", params.path))?;
        self.renderer.render(&CreateResult::new(model).to_string());
        Ok(())
    }

    async fn show_plan(&self, id: u64, json: bool) -> Result<()> {
        let model = operations::load_model(&self.store, id)
            .await
            .with_context(|| format!("Failed to show plan {id}"))?;
        if json {
            return self.renderer.render_json(&model.view());
        }
        self.renderer
            .render(&PlanReport::new(&model).as_of(self.today).to_string());
        Ok(())
    }

    async fn critical_path(&self, params: &Id) -> Result<()> {
        let model = operations::load_model(&self.store, params.id)
            .await
            .with_context(|| format!("Failed to load plan {}", params.id))?;
        self.renderer.render(&CriticalPath(&model).to_string());
        Ok(())
    }

    async fn delete_plan(&self, params: &DeletePlan) -> Result<()> {
        if !params.confirmed {
            self.renderer.render(
                &OperationStatus::failure(format!(
                    "Deleting plan {} cannot be undone. Re-run with --confirm to proceed.",
                    params.id
                ))
                .to_string(),
            );
            return Ok(());
        }
        let document = operations::delete_plan(&self.store, params)
            .await
            .with_context(|| format!("Failed to delete plan {}", params.id))?;
        self.renderer.render(&DeleteResult::new(document).to_string());
        Ok(())
    }

    async fn set_task_status(&self, params: &SetTaskStatus) -> Result<()> {
        debug!("set_task_status: {params:?}");
        let result = operations::set_task_status(&self.store, params, Timestamp::now())
            .await
            .with_context(|| format!("Failed to update task '{}'", params.task_id))?;
        self.renderer.render(&result.to_string());
        Ok(())
    }

    async fn toggle_task(&self, params: &ToggleTask) -> Result<()> {
        debug!("toggle_task: {params:?}");
        let result = operations::toggle_task(&self.store, params, Timestamp::now())
            .await
            .with_context(|| format!("Failed to toggle task '{}'", params.task_id))?;
        self.renderer.render(&result.to_string());
        Ok(())
    }

    async fn show_task(&self, params: &TaskRef) -> Result<()> {
        let model = operations::load_model(&self.store, params.plan_id)
            .await
            .with_context(|| format!("Failed to load plan {}", params.plan_id))?;
        let task = ScheduledTask::find(&model, &params.task_id).ok_or_else(|| {
            PlanError::TaskNotFound {
                plan_id: params.plan_id,
                task: params.task_id.clone(),
            }
        })?;
        self.renderer.render(&task.as_of(self.today).to_string());
        Ok(())
    }

    async fn ready_tasks(&self, params: &Id) -> Result<()> {
        let tasks = operations::actionable_tasks(&self.store, params.id)
            .await
            .with_context(|| format!("Failed to load plan {}", params.id))?;
        self.renderer.render(&format!(
            "# Ready tasks in plan {}\n\n{tasks}",
            params.id
        ));
        Ok(())
    }
}
