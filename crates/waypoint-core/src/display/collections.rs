//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::{GoalSummary, PlanSummary, Task};

/// Newtype wrapper for displaying plan summaries.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::display::PlanSummaries;
///
/// let summaries = PlanSummaries(vec![]);
/// assert_eq!(summaries.to_string(), "No plans found.\n");
/// ```
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl PlanSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&PlanSummary> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanSummary> {
        self.0.iter()
    }
}

impl Index<usize> for PlanSummaries {
    type Output = PlanSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for PlanSummaries {
    type Item = PlanSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlanSummaries {
    type Item = &'a PlanSummary;
    type IntoIter = std::slice::Iter<'a, PlanSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        for plan in &self.0 {
            write!(f, "{plan}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying goal summaries.
pub struct GoalSummaries(pub Vec<GoalSummary>);

impl GoalSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GoalSummary> {
        self.0.iter()
    }
}

impl Index<usize> for GoalSummaries {
    type Output = GoalSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl fmt::Display for GoalSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No goals found.");
        }
        for goal in &self.0 {
            write!(f, "{goal}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a list of tasks outside their plan.
pub struct Tasks(pub Vec<Task>);

impl Tasks {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.0.iter()
    }

    /// Task ids in list order.
    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|t| t.task_id.as_str()).collect()
    }
}

impl Index<usize> for Tasks {
    type Output = Task;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Tasks {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tasks {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks found.");
        }
        for task in &self.0 {
            write!(f, "{task}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::models::PlanType;

    fn summary(id: u64, headline: &str) -> PlanSummary {
        PlanSummary {
            id,
            goal_id: 1,
            headline: headline.to_string(),
            plan_type: PlanType::Moderate,
            start_date: date(2024, 1, 15),
            estimated_completion: date(2024, 1, 19),
            total_duration_days: 5,
            total_tasks: 4,
            completed_tasks: 1,
            critical_tasks: 2,
            progress_percent: 25,
            deadline_overrun_days: None,
            created_at: Timestamp::from_second(1640995200).unwrap(),
        }
    }

    #[test]
    fn test_plan_summaries_display() {
        let output = PlanSummaries(vec![summary(1, "Move"), summary(2, "Launch")]).to_string();
        assert!(output.contains("## Move (ID: 1) (1/4)"));
        assert!(output.contains("## Launch (ID: 2) (1/4)"));
        assert!(output.contains("- **Progress**: 25%"));
        assert!(!output.contains("Deadline"));

        assert_eq!(PlanSummaries(vec![]).to_string(), "No plans found.\n");
    }

    #[test]
    fn test_goal_summaries_display() {
        assert_eq!(GoalSummaries(vec![]).to_string(), "No goals found.\n");

        let goals = GoalSummaries(vec![GoalSummary {
            id: 4,
            headline: "Learn Spanish".to_string(),
            deadline: None,
            plan_count: 0,
            created_at: Timestamp::from_second(1640995200).unwrap(),
        }]);
        assert_eq!(goals.len(), 1);
        let output = goals.to_string();
        assert!(output.contains("## Learn Spanish (ID: 4)"));
        assert!(output.contains("- **Plans**: 0"));
        assert!(!output.contains("Deadline"));
    }

    #[test]
    fn test_tasks_display() {
        assert_eq!(Tasks(vec![]).to_string(), "No tasks found.\n");

        let tasks = Tasks(vec![
            Task::new("T1", "Survey", 1),
            Task::new("T4", "Paint", 3).with_dependencies(["T1"]),
        ]);
        assert_eq!(tasks.ids(), vec!["T1", "T4"]);
        let output = tasks.to_string();
        assert!(output.contains("### T1. Survey (○ Pending)"));
        assert!(output.contains("### T4. Paint (○ Pending)"));
        assert!(output.contains("- Duration: 3 days"));
    }
}
