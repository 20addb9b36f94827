//! Working-day calendar arithmetic.
//!
//! Weekends (when excluded) and unavailable dates are skipped without
//! consuming any of a task's duration.

use std::collections::BTreeSet;

use jiff::civil::{Date, Weekday};

use crate::error::Result;

/// Decides which calendar days count as working days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCalendar {
    skip_weekends: bool,
    unavailable: BTreeSet<Date>,
}

impl WorkCalendar {
    pub fn new(skip_weekends: bool, unavailable: impl IntoIterator<Item = Date>) -> Self {
        Self {
            skip_weekends,
            unavailable: unavailable.into_iter().collect(),
        }
    }

    /// A calendar in which every day is a working day.
    pub fn every_day() -> Self {
        Self::new(false, [])
    }

    pub fn skips_weekends(&self) -> bool {
        self.skip_weekends
    }

    pub fn is_work_day(&self, day: Date) -> bool {
        if self.skip_weekends && matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday) {
            return false;
        }
        !self.unavailable.contains(&day)
    }

    /// The first working day on or after `day`.
    pub fn next_work_day(&self, day: Date) -> Result<Date> {
        let mut current = day;
        while !self.is_work_day(current) {
            current = current.tomorrow()?;
        }
        Ok(current)
    }

    /// Moves forward from `from` until `days` working days have been passed.
    ///
    /// `from` itself is not counted, so adding zero days returns `from`.
    ///
    /// ```rust
    /// use jiff::civil::date;
    /// use waypoint_core::WorkCalendar;
    ///
    /// let calendar = WorkCalendar::new(true, []);
    /// // Friday + 1 working day lands on Monday
    /// assert_eq!(calendar.add_work_days(date(2024, 1, 19), 1).unwrap(), date(2024, 1, 22));
    /// ```
    pub fn add_work_days(&self, from: Date, days: u32) -> Result<Date> {
        let mut current = from;
        let mut remaining = days;
        while remaining > 0 {
            current = current.tomorrow()?;
            if self.is_work_day(current) {
                remaining -= 1;
            }
        }
        Ok(current)
    }

    /// The first `count` working days on or after `start`, in order.
    pub fn work_days(&self, start: Date, count: usize) -> Result<Vec<Date>> {
        let mut days = Vec::with_capacity(count);
        if count == 0 {
            return Ok(days);
        }
        let mut current = self.next_work_day(start)?;
        days.push(current);
        while days.len() < count {
            current = self.next_work_day(current.tomorrow()?)?;
            days.push(current);
        }
        Ok(days)
    }

    /// Number of working days in the inclusive range `from..=through`.
    ///
    /// Returns zero when `through` is before `from`.
    pub fn count_work_days(&self, from: Date, through: Date) -> Result<i64> {
        let mut count = 0;
        let mut current = from;
        while current <= through {
            if self.is_work_day(current) {
                count += 1;
            }
            if current == through {
                break;
            }
            current = current.tomorrow()?;
        }
        Ok(count)
    }
}
