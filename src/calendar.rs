// src/calendar.rs
//! Month-grid generation for the calendar view.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::TrainingSession;

/// One cell of the month grid. Cells before the first of the month carry no
/// date and exist only to pad the first week row (Sunday-first layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: Option<NaiveDate>,
    pub is_today: bool,
    pub is_selected: bool,
    /// Sessions scheduled on this day, by id.
    pub session_ids: Vec<i64>,
}

impl CalendarDay {
    #[must_use]
    pub fn has_sessions(&self) -> bool {
        !self.session_ids.is_empty()
    }

    /// Day-of-month label, blank for padding cells.
    #[must_use]
    pub fn day_number(&self) -> String {
        self.date.map_or_else(String::new, |d| d.day().to_string())
    }
}

/// # Panics
/// Panics when `month` is outside 1..=12.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1).expect("valid month start");
    (next_first - first).num_days() as u32
}

#[must_use]
pub const fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

#[must_use]
pub const fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// `MMMM yyyy` header, e.g. "September 2026".
///
/// # Panics
/// Panics when `month` is outside 1..=12.
#[must_use]
pub fn month_title(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("valid month start")
        .format("%B %Y")
        .to_string()
}

/// Weekday column headers in grid order.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Builds the cell list for one month: leading padding cells up to the
/// weekday of the 1st, then one cell per day carrying that day's sessions.
///
/// # Panics
/// Panics when `month` is outside 1..=12.
#[must_use]
pub fn month_grid(
    year: i32,
    month: u32,
    sessions: &[TrainingSession],
    today: NaiveDate,
    selected: Option<NaiveDate>,
) -> Vec<CalendarDay> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
    let offset = first.weekday().num_days_from_sunday() as usize;

    let mut days = Vec::with_capacity(offset + days_in_month(year, month) as usize);
    for _ in 0..offset {
        days.push(CalendarDay {
            date: None,
            is_today: false,
            is_selected: false,
            session_ids: Vec::new(),
        });
    }
    for day in 1..=days_in_month(year, month) {
        let date = NaiveDate::from_ymd_opt(year, month, day).expect("day within month");
        let session_ids = sessions
            .iter()
            .filter(|s| s.date == date)
            .map(|s| s.id)
            .collect();
        days.push(CalendarDay {
            date: Some(date),
            is_today: date == today,
            is_selected: selected == Some(date),
            session_ids,
        });
    }
    days
}

/// Cells sliced into week rows for rendering; the last row may be short.
#[must_use]
pub fn week_rows(days: &[CalendarDay]) -> Vec<&[CalendarDay]> {
    days.chunks(7).collect()
}

/// True when the grid cell for `date` falls on a weekend column.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
