//! MCP tool handler implementations.

use std::sync::Arc;

use jiff::{civil::Date, Timestamp, Zoned};
use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;
use waypoint_core::{
    display::{CreateResult, CriticalPath, DeleteResult, PlanReport, ScheduledTask},
    operations,
    params as core,
    PlanError, PlanStore,
};

use super::errors::to_mcp_error;

/// Transparent MCP wrapper adding `JsonSchema` to a core parameter type.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type ListPlans = McpParams<core::ListPlans>;
pub type ListGoals = McpParams<core::ListGoals>;
pub type CreateGoal = McpParams<core::CreateGoal>;
pub type ImportPlan = McpParams<core::ImportPlan>;
pub type DeletePlan = McpParams<core::DeletePlan>;
pub type TaskRef = McpParams<core::TaskRef>;
pub type SetTaskStatus = McpParams<core::SetTaskStatus>;
pub type ToggleTask = McpParams<core::ToggleTask>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(body: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(body)])
}

/// Tool bodies, one method per MCP tool.
///
/// The store sits behind a mutex so each load, change and save runs as one
/// unit even when several tool calls arrive at once.
pub struct McpHandlers {
    store: Arc<Mutex<PlanStore>>,
    today: Option<Date>,
}

impl McpHandlers {
    pub fn new(store: Arc<Mutex<PlanStore>>, today: Option<Date>) -> Self {
        Self { store, today }
    }

    fn today(&self) -> Date {
        self.today.unwrap_or_else(|| Zoned::now().date())
    }

    pub async fn list_plans(&self, Parameters(params): Parameters<ListPlans>) -> McpResult {
        debug!("list_plans: {params:?}");
        let store = self.store.lock().await;
        let summaries = operations::list_summaries(&store, params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list plans", &e))?;
        Ok(text(summaries.to_string()))
    }

    pub async fn list_goals(&self, Parameters(params): Parameters<ListGoals>) -> McpResult {
        debug!("list_goals: {params:?}");
        let store = self.store.lock().await;
        let goals = operations::list_goals(&store, params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list goals", &e))?;
        Ok(text(goals.to_string()))
    }

    pub async fn show_goal(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_goal: {params:?}");
        let id = params.as_ref().id;
        let store = self.store.lock().await;
        let details = operations::show_goal(&store, id)
            .await
            .map_err(|e| to_mcp_error("Failed to show goal", &e))?;
        Ok(text(details.to_string()))
    }

    pub async fn create_goal(&self, Parameters(params): Parameters<CreateGoal>) -> McpResult {
        debug!("create_goal: {params:?}");
        let store = self.store.lock().await;
        let goal = operations::create_goal(&store, params.as_ref(), Timestamp::now())
            .await
            .map_err(|e| to_mcp_error("Failed to create goal", &e))?;
        Ok(text(CreateResult::new(goal).to_string()))
    }

    pub async fn show_plan(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_plan: {params:?}");
        let id = params.as_ref().id;
        let store = self.store.lock().await;
        let model = operations::load_model(&store, id)
            .await
            .map_err(|e| to_mcp_error("Failed to show plan", &e))?;
        Ok(text(PlanReport::new(&model).as_of(self.today()).to_string()))
    }

    pub async fn plan_schedule(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("plan_schedule: {params:?}");
        let id = params.as_ref().id;
        let store = self.store.lock().await;
        let model = operations::load_model(&store, id)
            .await
            .map_err(|e| to_mcp_error("Failed to load plan", &e))?;
        let json = serde_json::to_string_pretty(&model.view())
            .map_err(|e| to_mcp_error("Failed to serialize plan", &PlanError::from(e)))?;
        Ok(text(json))
    }

    pub async fn critical_path(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("critical_path: {params:?}");
        let id = params.as_ref().id;
        let store = self.store.lock().await;
        let model = operations::load_model(&store, id)
            .await
            .map_err(|e| to_mcp_error("Failed to load plan", &e))?;
        Ok(text(CriticalPath(&model).to_string()))
    }

    pub async fn import_plan(&self, Parameters(params): Parameters<ImportPlan>) -> McpResult {
        debug!("import_plan: {params:?}");
        let store = self.store.lock().await;
        let model = operations::import_plan(&store, params.as_ref(), self.today(), Timestamp::now())
            .await
            .map_err(|e| to_mcp_error("Failed to import plan", &e))?;
        Ok(text(CreateResult::new(model).to_string()))
    }

    pub async fn delete_plan(&self, Parameters(params): Parameters<DeletePlan>) -> McpResult {
        debug!("delete_plan: {params:?}");
        let store = self.store.lock().await;
        let document = operations::delete_plan(&store, params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to delete plan", &e))?;
        Ok(text(DeleteResult::new(document).to_string()))
    }

    pub async fn set_task_status(
        &self,
        Parameters(params): Parameters<SetTaskStatus>,
    ) -> McpResult {
        debug!("set_task_status: {params:?}");
        let store = self.store.lock().await;
        let result = operations::set_task_status(&store, params.as_ref(), Timestamp::now())
            .await
            .map_err(|e| to_mcp_error("Failed to update task", &e))?;
        Ok(text(result.to_string()))
    }

    pub async fn toggle_task(&self, Parameters(params): Parameters<ToggleTask>) -> McpResult {
        debug!("toggle_task: {params:?}");
        let store = self.store.lock().await;
        let result = operations::toggle_task(&store, params.as_ref(), Timestamp::now())
            .await
            .map_err(|e| to_mcp_error("Failed to toggle task", &e))?;
        Ok(text(result.to_string()))
    }

    pub async fn show_task(&self, Parameters(params): Parameters<TaskRef>) -> McpResult {
        debug!("show_task: {params:?}");
        let task_ref = params.as_ref();
        let store = self.store.lock().await;
        let model = operations::load_model(&store, task_ref.plan_id)
            .await
            .map_err(|e| to_mcp_error("Failed to load plan", &e))?;
        let task = ScheduledTask::find(&model, &task_ref.task_id).ok_or_else(|| {
            to_mcp_error(
                "Failed to show task",
                &PlanError::TaskNotFound {
                    plan_id: task_ref.plan_id,
                    task: task_ref.task_id.clone(),
                },
            )
        })?;
        Ok(text(task.as_of(self.today()).to_string()))
    }

    pub async fn actionable_tasks(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("actionable_tasks: {params:?}");
        let id = params.as_ref().id;
        let store = self.store.lock().await;
        let tasks = operations::actionable_tasks(&store, id)
            .await
            .map_err(|e| to_mcp_error("Failed to load plan", &e))?;
        Ok(text(tasks.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use jiff::civil::date;
    use rmcp::model::ErrorCode;
    use tempfile::TempDir;
    use waypoint_core::PlanStoreBuilder;

    use super::*;

    const PLAN: &str = r#"{
        "goal_text": "Paint the shed",
        "plan_summary": "Shed makeover",
        "tasks": [
            {"id": "T1", "title": "Sand", "duration_days": 1},
            {"id": "T2", "title": "Paint", "duration_days": 2, "depends_on": ["T1"]}
        ]
    }"#;

    async fn handlers(dir: &Path) -> McpHandlers {
        let store = PlanStoreBuilder::new()
            .with_directory(Some(dir.join("plans")))
            .build()
            .await
            .unwrap();
        McpHandlers::new(Arc::new(Mutex::new(store)), Some(date(2024, 1, 15)))
    }

    fn params<T: JsonSchema>(value: T) -> Parameters<McpParams<T>> {
        Parameters(McpParams(value))
    }

    fn body(result: &CallToolResult) -> String {
        let value = serde_json::to_value(result).unwrap();
        value["content"][0]["text"].as_str().unwrap().to_string()
    }

    async fn import(handlers: &McpHandlers, dir: &Path) {
        let path = dir.join("plan.json");
        std::fs::write(&path, PLAN).unwrap();
        handlers
            .import_plan(params(core::ImportPlan {
                path: path.display().to_string(),
                ..core::ImportPlan::default()
            }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_import_and_show() {
        let temp_dir = TempDir::new().unwrap();
        let handlers = handlers(temp_dir.path()).await;
        import(&handlers, temp_dir.path()).await;

        let result = handlers.show_plan(params(core::Id { id: 1 })).await.unwrap();
        let output = body(&result);
        assert!(output.contains("# 1. Shed makeover"));
        assert!(output.contains("- Critical path: T1 → T2"));

        let result = handlers
            .plan_schedule(params(core::Id { id: 1 }))
            .await
            .unwrap();
        let view: serde_json::Value = serde_json::from_str(&body(&result)).unwrap();
        assert_eq!(view["estimated_completion"], "2024-01-17");
    }

    #[tokio::test]
    async fn test_task_flow() {
        let temp_dir = TempDir::new().unwrap();
        let handlers = handlers(temp_dir.path()).await;
        import(&handlers, temp_dir.path()).await;

        let err = handlers
            .set_task_status(params(core::SetTaskStatus {
                plan_id: 1,
                task_id: "T2".to_string(),
                status: "in_progress".to_string(),
                force: false,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let result = handlers
            .toggle_task(params(core::ToggleTask {
                plan_id: 1,
                task_id: "T1".to_string(),
                force: false,
            }))
            .await
            .unwrap();
        assert!(body(&result).contains("- T1: pending → completed"));

        let result = handlers
            .actionable_tasks(params(core::Id { id: 1 }))
            .await
            .unwrap();
        assert!(body(&result).contains("### T2. Paint"));
    }

    #[tokio::test]
    async fn test_goal_tools() {
        let temp_dir = TempDir::new().unwrap();
        let handlers = handlers(temp_dir.path()).await;
        import(&handlers, temp_dir.path()).await;

        let result = handlers
            .create_goal(params(core::CreateGoal {
                goal_text: "Fix the fence".to_string(),
                work_on_weekends: true,
                ..core::CreateGoal::default()
            }))
            .await
            .unwrap();
        let output = body(&result);
        assert!(output.starts_with("Created goal with ID: 2"));
        assert!(output.contains("- Weekends: working days"));

        let result = handlers
            .list_goals(params(core::ListGoals::default()))
            .await
            .unwrap();
        let output = body(&result);
        assert!(output.contains("## Paint the shed (ID: 1)"));
        assert!(output.contains("## Fix the fence (ID: 2)"));

        let result = handlers.show_goal(params(core::Id { id: 1 })).await.unwrap();
        assert!(body(&result).contains("## Shed makeover (ID: 1) (0/2)"));

        let err = handlers
            .show_goal(params(core::Id { id: 5 }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let err = handlers
            .create_goal(params(core::CreateGoal::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_missing_plan_is_invalid_params() {
        let temp_dir = TempDir::new().unwrap();
        let handlers = handlers(temp_dir.path()).await;
        let err = handlers
            .critical_path(params(core::Id { id: 9 }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("Plan with ID 9 not found"));
    }
}
