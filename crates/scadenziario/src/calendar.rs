//! The month calendar and its due date store
//!
//! A [`MonthCalendar`] holds the displayed month, the due dates attached to
//! each day of the month, and the colors used to render it. It produces the
//! weekly grid consumed by the HTML page and the JSON API.

use chrono::{Datelike, Local, Months, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::CalendarError;
use crate::types::{CalendarConfig, CalendarView, DueDateEntry, NewDueDate, Week, DAYS_IN_WEEK};

/// Highest day of the month an entry can be attached to
pub const MAX_DAY: u32 = 31;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MonthCalendar {
    // Invariant: always the first day of the displayed month
    first: NaiveDate,
    due_dates: BTreeMap<u32, Vec<DueDateEntry>>,
    primary_color: String,
    accent_color: String,
}

impl MonthCalendar {
    /// Create a calendar, defaulting month and year to the local date
    pub fn new(config: CalendarConfig) -> Result<Self, CalendarError> {
        Self::with_today(config, Local::now().date_naive())
    }

    /// Create a calendar, taking missing month/year values from `today`
    pub fn with_today(config: CalendarConfig, today: NaiveDate) -> Result<Self, CalendarError> {
        let month = config.month.unwrap_or_else(|| today.month());
        let year = config.year.unwrap_or_else(|| today.year());
        let first = first_of_month(year, month)?;

        for color in [&config.primary_color, &config.accent_color] {
            if !is_css_color(color) {
                return Err(CalendarError::Validation(format!(
                    "'{}' is not a usable CSS color",
                    color
                )));
            }
        }

        Ok(Self {
            first,
            due_dates: BTreeMap::new(),
            primary_color: config.primary_color,
            accent_color: config.accent_color,
        })
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Full English name of the displayed month
    pub fn month_name(&self) -> String {
        self.first.format("%B").to_string()
    }

    /// Number of days in the displayed month
    pub fn days_in_month(&self) -> u32 {
        // Only December of the last representable year has no following month
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .map_or(MAX_DAY, |last| last.day())
    }

    /// Attach a due date to a day of the month.
    ///
    /// The day must be within 1-31. Days past the end of the displayed month
    /// are stored but do not show up in the grid. Entries for the same day
    /// keep their insertion order, and identical entries are not merged.
    pub fn add_due_date(&mut self, new: NewDueDate) -> Result<(), CalendarError> {
        if !(1..=MAX_DAY).contains(&new.day) {
            return Err(CalendarError::OutOfRange {
                day: new.day.into(),
                max: MAX_DAY,
            });
        }
        if new.title.trim().is_empty() {
            return Err(CalendarError::Validation(
                "title must not be empty".to_string(),
            ));
        }

        let (day, entry) = new.into_entry();
        debug!(
            day = day,
            title = %entry.title,
            priority = %entry.priority,
            "Adding due date"
        );
        self.due_dates.entry(day).or_default().push(entry);
        Ok(())
    }

    /// Entries attached to `day`, in insertion order
    pub fn entries_for_day(&self, day: u32) -> &[DueDateEntry] {
        self.due_dates.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_entries(&self) -> usize {
        self.due_dates.values().map(Vec::len).sum()
    }

    /// Compute the weekly grid of the displayed month
    pub fn grid_data(&self) -> CalendarView {
        let start_weekday = self.first.weekday().num_days_from_monday() as usize;

        CalendarView {
            month: self.month(),
            year: self.year(),
            month_name: self.month_name(),
            weeks: build_weeks(start_weekday, self.days_in_month()),
            due_dates: self.due_dates.clone(),
            primary_color: self.primary_color.clone(),
            accent_color: self.accent_color.clone(),
        }
    }

    /// Serializable view of the calendar, identical to [`Self::grid_data`]
    pub fn to_view_model(&self) -> CalendarView {
        self.grid_data()
    }

    /// Move to the following month, rolling December over into January
    pub fn next_month(&mut self) {
        match self.first.checked_add_months(Months::new(1)) {
            Some(first) => {
                self.first = first;
                debug!(month = self.month(), year = self.year(), "Moved to next month");
            }
            None => warn!(
                year = self.year(),
                "Already at the last representable month"
            ),
        }
    }

    /// Move to the preceding month, rolling January back into December
    pub fn prev_month(&mut self) {
        match self.first.checked_sub_months(Months::new(1)) {
            Some(first) => {
                self.first = first;
                debug!(
                    month = self.month(),
                    year = self.year(),
                    "Moved to previous month"
                );
            }
            None => warn!(
                year = self.year(),
                "Already at the first representable month"
            ),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidDate { year, month });
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidDate { year, month })
}

/// Lay out days `1..=total_days` in rows of seven, starting at column
/// `start_weekday` (Monday = 0) and padding both ends with `None`
fn build_weeks(start_weekday: usize, total_days: u32) -> Vec<Week> {
    debug_assert!(start_weekday < DAYS_IN_WEEK);

    let mut weeks = Vec::new();
    let mut week: Week = [None; DAYS_IN_WEEK];
    let mut slot = start_weekday;

    for day in 1..=total_days {
        week[slot] = Some(day);
        slot += 1;
        if slot == DAYS_IN_WEEK {
            weeks.push(week);
            week = [None; DAYS_IN_WEEK];
            slot = 0;
        }
    }

    if slot > 0 {
        weeks.push(week);
    }

    weeks
}

/// Colors end up inside a `<style>` block, so only allow characters that
/// appear in hex, named and functional CSS colors
fn is_css_color(color: &str) -> bool {
    !color.trim().is_empty()
        && color
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "#(),.% ".contains(c))
}
