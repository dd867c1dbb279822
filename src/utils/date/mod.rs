// Date utility functions

use chrono::{Datelike, Duration, NaiveDate};

/// Calculate the start of the week containing the given date.
///
/// # Arguments
/// * `date` - The date to find the week start for
/// * `first_day_of_week` - 0 = Sunday, 1 = Monday, etc.
pub fn get_week_start(date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let offset = (weekday - first_day_of_week as i64 + 7) % 7;
    date - Duration::days(offset)
}

/// Format a column header, e.g. "Mon 08/01".
pub fn format_column_header(date: NaiveDate) -> String {
    date.format("%a %d/%m").to_string()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    let day = date.weekday().num_days_from_sunday();
    day == 0 || day == 6
}
