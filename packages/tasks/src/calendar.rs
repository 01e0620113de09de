// ABOUTME: Month calendar layout for the calendar view
// ABOUTME: Sunday-start week grid covering a month and per-day task grouping

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::types::Task;

/// A calendar month whose whole week grid lies inside chrono's date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    first: NaiveDate,
    last: NaiveDate,
    grid_start: NaiveDate,
    grid_end: NaiveDate,
}

impl CalendarMonth {
    /// `None` for a month outside 1..=12 or one whose padded grid cannot be represented
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;

        let lead = i64::from(first.weekday().num_days_from_sunday());
        let trail = 6 - i64::from(last.weekday().num_days_from_sunday());
        let grid_start = first.checked_sub_signed(Duration::days(lead))?;
        let grid_end = last.checked_add_signed(Duration::days(trail))?;

        Some(Self {
            first,
            last,
            grid_start,
            grid_end,
        })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    pub fn previous(&self) -> Option<Self> {
        let day = self.first.pred_opt()?;
        Self::new(day.year(), day.month())
    }

    pub fn next(&self) -> Option<Self> {
        let day = self.last.succ_opt()?;
        Self::new(day.year(), day.month())
    }

    /// Every day from the Sunday on/before the 1st through the Saturday
    /// on/after the last day. Always a whole number of weeks.
    pub fn grid(&self) -> Vec<NaiveDate> {
        let end = self.grid_end;
        self.grid_start
            .iter_days()
            .take_while(|d| *d <= end)
            .collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last
    }
}

/// Tasks due on a given (UTC) calendar date, in input order
pub fn tasks_for_day<'a>(tasks: &'a [Task], date: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.due_at.map(|d| d.date_naive() == date).unwrap_or(false))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

impl CalendarView {
    /// Lay out already filtered and sorted tasks on the month grid
    pub fn build(month: CalendarMonth, tasks: &[Task]) -> Self {
        let days = month
            .grid()
            .into_iter()
            .map(|date| CalendarDay {
                date,
                in_month: month.contains(date),
                tasks: tasks_for_day(tasks, date).into_iter().cloned().collect(),
            })
            .collect();

        Self {
            year: month.year(),
            month: month.month(),
            days,
        }
    }
}
