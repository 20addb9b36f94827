//! Common business operations for the Waypoint planner.
//!
//! The CLI and the MCP server both go through these functions, so loading a
//! document, building its snapshot, applying a lifecycle change and writing
//! the result back happen the same way everywhere. Clock readings are passed
//! in by the caller.

use std::path::PathBuf;

use jiff::{civil::Date, Timestamp};
use log::{debug, info};
use tokio::task::{self, JoinSet};

use crate::{
    display::{GoalDetails, GoalSummaries, PlanSummaries, Tasks, UpdateResult},
    error::{PlanError, Result},
    models::{GeneratedPlan, Goal, GoalSummary, Task, TaskStatus},
    params::{
        CreateGoal, DeletePlan, ImportPlan, ListGoals, ListPlans, SetTaskStatus, ToggleTask,
    },
    store::{PlanDocument, PlanStore},
    PlanModel,
};

/// Stores a goal that plans can later be imported into.
pub async fn create_goal(store: &PlanStore, params: &CreateGoal, now: Timestamp) -> Result<Goal> {
    let constraints = params.validate()?;
    let goal = store
        .create_goal(params.goal_text.trim().to_string(), constraints, now)
        .await?;
    info!("Created goal {}", goal.id);
    Ok(goal)
}

/// Goals in id order with the number of plans each one has.
pub async fn list_goals(store: &PlanStore, params: &ListGoals) -> Result<GoalSummaries> {
    let goals = params.page(store.goals().await?);
    let plans = store.list().await?;
    Ok(GoalSummaries(
        goals
            .iter()
            .map(|goal| {
                let count = plans.iter().filter(|d| d.goal.id == goal.id).count();
                GoalSummary::new(goal, count)
            })
            .collect(),
    ))
}

/// A goal together with the summaries of its plans.
pub async fn show_goal(store: &PlanStore, id: u64) -> Result<GoalDetails> {
    let goal = store.load_goal(id).await?;
    let plans = list_summaries(
        store,
        &ListPlans {
            goal_id: Some(id),
            ..ListPlans::default()
        },
    )
    .await?;
    Ok(GoalDetails { goal, plans })
}

/// Reads a generator output file and stores it as a new plan.
///
/// The schedule starts on the requested start date, or `today` when none
/// was given.
pub async fn import_plan(
    store: &PlanStore,
    params: &ImportPlan,
    today: Date,
    now: Timestamp,
) -> Result<PlanModel> {
    let start_date = params.validate()?.unwrap_or(today);
    let path = PathBuf::from(&params.path);

    let generated = task::spawn_blocking(move || -> Result<GeneratedPlan> {
        let text = std::fs::read_to_string(&path)
            .map_err(|source| PlanError::FileSystem { path, source })?;
        Ok(serde_json::from_str(&text)?)
    })
    .await
    .map_err(PlanError::join)??;

    let document = store
        .create(generated, params.goal_id, start_date, now)
        .await?;
    info!(
        "Imported plan {} for goal {} with {} tasks",
        document.plan.id,
        document.goal.id,
        document.plan.tasks.len()
    );
    document.model()
}

/// Loads and schedules one plan.
pub async fn load_model(store: &PlanStore, id: u64) -> Result<PlanModel> {
    store.load(id).await?.model()
}

/// Builds snapshots for many documents concurrently.
///
/// Plans share nothing, so each one is scheduled on its own blocking task.
/// The result keeps the input order.
pub async fn recompute_all(documents: Vec<PlanDocument>) -> Result<Vec<PlanModel>> {
    let count = documents.len();
    let mut set = JoinSet::new();
    for (position, document) in documents.into_iter().enumerate() {
        set.spawn_blocking(move || (position, document.model()));
    }

    let mut models = Vec::with_capacity(count);
    while let Some(joined) = set.join_next().await {
        let (position, model) = joined.map_err(PlanError::join)?;
        models.push((position, model?));
    }
    models.sort_by_key(|(position, _)| *position);
    debug!("Recomputed {count} plans");
    Ok(models.into_iter().map(|(_, model)| model).collect())
}

/// Summaries of stored plans in id order, optionally limited to one goal
/// and paged with `skip` and `limit`.
pub async fn list_summaries(store: &PlanStore, params: &ListPlans) -> Result<PlanSummaries> {
    let documents = params.page(
        store
            .list()
            .await?
            .into_iter()
            .filter(|d| params.goal_id.map_or(true, |goal| d.goal.id == goal)),
    );
    let models = recompute_all(documents).await?;
    Ok(PlanSummaries(models.iter().map(PlanModel::summary).collect()))
}

/// Applies a status change and persists the new snapshot.
pub async fn set_task_status(
    store: &PlanStore,
    params: &SetTaskStatus,
    now: Timestamp,
) -> Result<UpdateResult<PlanModel>> {
    let (status, policy) = params.validate()?;
    let mut document = store.load(params.plan_id).await?;
    let before = document.model()?;
    let from = task_status(&before, params.plan_id, &params.task_id)?;

    let after = before.set_task_status(&params.task_id, status, now, policy)?;
    document.update_from(&after);
    store.save(document).await?;

    Ok(UpdateResult::with_changes(
        after,
        vec![format!("{}: {} → {}", params.task_id, from, status)],
    ))
}

/// Flips a task's completion and persists the new snapshot.
pub async fn toggle_task(
    store: &PlanStore,
    params: &ToggleTask,
    now: Timestamp,
) -> Result<UpdateResult<PlanModel>> {
    let mut document = store.load(params.plan_id).await?;
    let before = document.model()?;
    let from = task_status(&before, params.plan_id, &params.task_id)?;

    let after = before.toggle_completion(&params.task_id, now, params.policy())?;
    let to = task_status(&after, params.plan_id, &params.task_id)?;
    document.update_from(&after);
    store.save(document).await?;

    Ok(UpdateResult::with_changes(
        after,
        vec![format!("{}: {} → {}", params.task_id, from, to)],
    ))
}

/// Tasks of a plan that can be started right now.
pub async fn actionable_tasks(store: &PlanStore, id: u64) -> Result<Tasks> {
    let model = load_model(store, id).await?;
    Ok(Tasks(model.actionable_tasks().into_iter().cloned().collect()))
}

/// Deletes a plan. Requires `confirmed`.
pub async fn delete_plan(store: &PlanStore, params: &DeletePlan) -> Result<PlanDocument> {
    if !params.confirmed {
        return Err(PlanError::invalid_input("confirmed")
            .with_reason("Deletion must be confirmed; it cannot be undone"));
    }
    let document = store
        .delete(params.id)
        .await?
        .ok_or(PlanError::PlanNotFound { id: params.id })?;
    info!("Deleted plan {}", params.id);
    Ok(document)
}

fn task_status(model: &PlanModel, plan_id: u64, task_id: &str) -> Result<TaskStatus> {
    model
        .task(task_id)
        .map(Task::status)
        .ok_or_else(|| PlanError::TaskNotFound {
            plan_id,
            task: task_id.to_string(),
        })
}
