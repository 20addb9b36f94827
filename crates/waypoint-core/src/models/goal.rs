//! Goal and scheduling constraint models.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use crate::{
    calendar::WorkCalendar,
    error::{PlanError, Result},
};

fn default_max_hours() -> u8 {
    8
}

fn default_true() -> bool {
    true
}

/// Calendar and capacity limits a plan has to respect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Constraints {
    /// Hard date the work should be done by
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Date>,

    /// Working hours available per day (1 to 24)
    #[serde(default = "default_max_hours")]
    pub max_hours_per_day: u8,

    #[serde(default = "default_true")]
    pub no_work_on_weekends: bool,

    /// Dates on which no work happens
    #[serde(default)]
    pub unavailable_dates: Vec<Date>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            deadline: None,
            max_hours_per_day: default_max_hours(),
            no_work_on_weekends: true,
            unavailable_dates: Vec::new(),
        }
    }
}

impl Constraints {
    pub fn validate(&self) -> Result<()> {
        if !(1..=24).contains(&self.max_hours_per_day) {
            return Err(PlanError::invalid_input("max_hours_per_day").with_reason(format!(
                "{} is outside 1..=24",
                self.max_hours_per_day
            )));
        }
        Ok(())
    }

    /// The working-day calendar these constraints describe.
    pub fn calendar(&self) -> WorkCalendar {
        WorkCalendar::new(
            self.no_work_on_weekends,
            self.unavailable_dates.iter().copied(),
        )
    }
}

/// The natural-language objective a plan was generated for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: u64,
    pub goal_text: String,
    #[serde(default)]
    pub constraints: Constraints,
    pub created_at: Timestamp,
}

impl Goal {
    /// First non-empty line of the goal text.
    pub fn headline(&self) -> &str {
        self.goal_text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("Untitled goal")
    }
}
