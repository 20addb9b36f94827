//! Parameter structures for Waypoint operations
//!
//! Interface-neutral request types shared by the CLI and the MCP server.
//! Each interface wraps them with its own derives: clap `Args` structs
//! convert into them with `From`, and the MCP layer wraps them in a
//! transparent serde newtype. The `schema` feature adds `JsonSchema` so the
//! MCP server can publish tool input schemas.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! String-typed fields (statuses, dates) are parsed by the `validate`
//! methods so every interface reports bad input the same way.

use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlanError, Result},
    lifecycle::DependencyPolicy,
    models::{Constraints, TaskStatus},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the plan or goal to operate on
    pub id: u64,
}

/// Parameters for listing plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListPlans {
    /// Only list plans generated for this goal
    #[serde(default)]
    pub goal_id: Option<u64>,
    /// Number of plans to skip, in id order
    #[serde(default)]
    pub skip: usize,
    /// Maximum number of plans to return. All when absent.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListPlans {
    /// Applies `skip` and `limit` to an id-ordered list.
    pub fn page<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        page(items, self.skip, self.limit)
    }
}

/// Parameters for listing goals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListGoals {
    /// Number of goals to skip, in id order
    #[serde(default)]
    pub skip: usize,
    /// Maximum number of goals to return. All when absent.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListGoals {
    /// Applies `skip` and `limit` to an id-ordered list.
    pub fn page<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        page(items, self.skip, self.limit)
    }
}

fn page<T>(items: impl IntoIterator<Item = T>, skip: usize, limit: Option<usize>) -> Vec<T> {
    items
        .into_iter()
        .skip(skip)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

/// Parameters for creating a goal before any plan exists for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateGoal {
    /// What the user wants to achieve
    pub goal_text: String,
    /// Date the work should be done by (YYYY-MM-DD)
    #[serde(default)]
    pub deadline: Option<String>,
    /// Working hours available per day, 1 to 24. Defaults to 8.
    #[serde(default)]
    pub max_hours_per_day: Option<u8>,
    /// Count Saturdays and Sundays as working days
    #[serde(default)]
    pub work_on_weekends: bool,
    /// Dates on which no work happens (YYYY-MM-DD)
    #[serde(default)]
    pub unavailable_dates: Vec<String>,
}

impl CreateGoal {
    /// Checks the text and parses the constraints.
    pub fn validate(&self) -> Result<Constraints> {
        if self.goal_text.trim().is_empty() {
            return Err(PlanError::invalid_input("goal_text").with_reason("Goal text cannot be empty"));
        }
        let defaults = Constraints::default();
        let constraints = Constraints {
            deadline: self.deadline.as_deref().map(parse_date).transpose()?,
            max_hours_per_day: self.max_hours_per_day.unwrap_or(defaults.max_hours_per_day),
            no_work_on_weekends: !self.work_on_weekends,
            unavailable_dates: self
                .unavailable_dates
                .iter()
                .map(String::as_str)
                .map(parse_date)
                .collect::<Result<_>>()?,
        };
        constraints.validate()?;
        Ok(constraints)
    }
}

/// Parameters for importing a generated plan from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ImportPlan {
    /// Path to the generator's JSON output
    pub path: String,
    /// Attach the plan to an existing goal instead of creating a new one
    #[serde(default)]
    pub goal_id: Option<u64>,
    /// First day the schedule may use (YYYY-MM-DD). Defaults to today.
    #[serde(default)]
    pub start_date: Option<String>,
}

impl ImportPlan {
    /// Parses the optional start date.
    pub fn validate(&self) -> Result<Option<Date>> {
        if self.path.trim().is_empty() {
            return Err(PlanError::invalid_input("path").with_reason("Path cannot be empty"));
        }
        self.start_date.as_deref().map(parse_date).transpose()
    }
}

/// Parameters for deleting a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DeletePlan {
    /// ID of the plan to delete
    pub id: u64,
    /// Must be true for the deletion to happen
    #[serde(default)]
    pub confirmed: bool,
}

/// Identifies one task inside a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TaskRef {
    /// ID of the plan containing the task
    pub plan_id: u64,
    /// Plan-scoped task id such as "T1"
    pub task_id: String,
}

/// Parameters for changing a task's status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetTaskStatus {
    /// ID of the plan containing the task
    pub plan_id: u64,
    /// Plan-scoped task id such as "T1"
    pub task_id: String,
    /// New status: 'pending', 'in_progress', 'completed' or 'blocked'
    pub status: String,
    /// Start the task even if some dependencies are not completed
    #[serde(default)]
    pub force: bool,
}

impl SetTaskStatus {
    /// Parses the status and resolves the dependency policy.
    pub fn validate(&self) -> Result<(TaskStatus, DependencyPolicy)> {
        let status = self
            .status
            .parse::<TaskStatus>()
            .map_err(|e| PlanError::invalid_input("status").with_reason(e))?;
        Ok((status, policy(self.force)))
    }
}

/// Parameters for flipping a task's completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ToggleTask {
    /// ID of the plan containing the task
    pub plan_id: u64,
    /// Plan-scoped task id such as "T1"
    pub task_id: String,
    /// Complete the task even if some dependencies are not completed
    #[serde(default)]
    pub force: bool,
}

impl ToggleTask {
    pub fn policy(&self) -> DependencyPolicy {
        policy(self.force)
    }
}

fn policy(force: bool) -> DependencyPolicy {
    if force {
        DependencyPolicy::Warn
    } else {
        DependencyPolicy::Enforce
    }
}

/// Parses a `YYYY-MM-DD` date into an `InvalidInput` error on failure.
pub fn parse_date(value: &str) -> Result<Date> {
    value.trim().parse::<Date>().map_err(|e| {
        PlanError::invalid_input("date").with_reason(format!("'{value}' is not a YYYY-MM-DD date: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_set_task_status_parses_status() {
        let params = SetTaskStatus {
            plan_id: 1,
            task_id: "T1".to_string(),
            status: "in_progress".to_string(),
            force: false,
        };
        let (status, policy) = params.validate().unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!(policy, DependencyPolicy::Enforce);
    }

    #[test]
    fn test_set_task_status_force_downgrades_to_warning() {
        let params = SetTaskStatus {
            status: "done".to_string(),
            force: true,
            ..SetTaskStatus::default()
        };
        let (status, policy) = params.validate().unwrap();
        assert_eq!(status, TaskStatus::Completed);
        assert_eq!(policy, DependencyPolicy::Warn);
    }

    #[test]
    fn test_set_task_status_rejects_unknown_status() {
        let params = SetTaskStatus {
            status: "finished".to_string(),
            ..SetTaskStatus::default()
        };
        match params.validate().unwrap_err() {
            PlanError::InvalidInput { field, reason } => {
                assert_eq!(field, "status");
                assert!(reason.contains("Invalid task status: finished"));
            }
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_import_plan_parses_start_date() {
        let params = ImportPlan {
            path: "plan.json".to_string(),
            goal_id: None,
            start_date: Some("2024-02-01".to_string()),
        };
        assert_eq!(params.validate().unwrap(), Some(date(2024, 2, 1)));

        let params = ImportPlan {
            start_date: Some("next tuesday".to_string()),
            ..params
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_list_plans_pages_in_order() {
        let params = ListPlans {
            skip: 1,
            limit: Some(2),
            ..ListPlans::default()
        };
        assert_eq!(params.page(1..=5), vec![2, 3]);
        assert_eq!(ListPlans::default().page(1..=3), vec![1, 2, 3]);
        assert!(ListGoals { skip: 4, limit: None }.page(1..=3).is_empty());
    }

    #[test]
    fn test_create_goal_parses_constraints() {
        let params = CreateGoal {
            goal_text: "Run a marathon".to_string(),
            deadline: Some("2024-06-01".to_string()),
            max_hours_per_day: Some(2),
            work_on_weekends: true,
            unavailable_dates: vec!["2024-03-29".to_string()],
        };
        let constraints = params.validate().unwrap();
        assert_eq!(constraints.deadline, Some(date(2024, 6, 1)));
        assert_eq!(constraints.max_hours_per_day, 2);
        assert!(!constraints.no_work_on_weekends);
        assert_eq!(constraints.unavailable_dates, vec![date(2024, 3, 29)]);

        let defaults = CreateGoal {
            goal_text: "Read more".to_string(),
            ..CreateGoal::default()
        };
        assert_eq!(defaults.validate().unwrap(), Constraints::default());
    }

    #[test]
    fn test_create_goal_rejects_bad_input() {
        assert!(CreateGoal::default().validate().is_err());
        let params = CreateGoal {
            goal_text: "Run".to_string(),
            max_hours_per_day: Some(0),
            ..CreateGoal::default()
        };
        assert!(params.validate().is_err());
        let params = CreateGoal {
            goal_text: "Run".to_string(),
            unavailable_dates: vec!["someday".to_string()],
            ..CreateGoal::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_import_plan_requires_path() {
        assert!(ImportPlan::default().validate().is_err());
    }
}
