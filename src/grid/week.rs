//! The seven day columns of the displayed week.

use chrono::{Duration, NaiveDate};

use crate::utils::date::get_week_start;

pub const DAYS_PER_WEEK: usize = 7;

/// Ordered calendar dates shown as grid columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekColumns {
    days: [NaiveDate; DAYS_PER_WEEK],
}

impl WeekColumns {
    /// Seven consecutive days starting at `first`.
    pub fn starting(first: NaiveDate) -> Self {
        Self {
            days: std::array::from_fn(|i| first + Duration::days(i as i64)),
        }
    }

    /// The week containing `date`, given the first day of week (0 = Sunday).
    pub fn containing(date: NaiveDate, first_day_of_week: u8) -> Self {
        Self::starting(get_week_start(date, first_day_of_week))
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn len(&self) -> usize {
        DAYS_PER_WEEK
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.days[DAYS_PER_WEEK - 1]
    }

    pub fn date(&self, column: usize) -> Option<NaiveDate> {
        self.days.get(column).copied()
    }

    /// Column index of `date`, if it falls in this week.
    pub fn column_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.days[0]).num_days();
        if (0..DAYS_PER_WEEK as i64).contains(&offset) {
            Some(offset as usize)
        } else {
            None
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.column_of(date).is_some()
    }

    pub fn next_week(&self) -> Self {
        Self::starting(self.days[0] + Duration::days(DAYS_PER_WEEK as i64))
    }

    pub fn previous_week(&self) -> Self {
        Self::starting(self.days[0] - Duration::days(DAYS_PER_WEEK as i64))
    }
}
