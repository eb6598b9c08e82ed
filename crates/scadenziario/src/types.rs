use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;

/// Number of slots in a week row
pub const DAYS_IN_WEEK: usize = 7;

/// One row of the calendar grid. `None` marks a slot outside the month.
pub type Week = [Option<u32>; DAYS_IN_WEEK];

/// Default primary color of the calendar page
pub const DEFAULT_PRIMARY_COLOR: &str = "#3498db";

/// Default accent color used for due date markers
pub const DEFAULT_ACCENT_COLOR: &str = "#e74c3c";

/// How urgent a due date is
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            _ => Err(CalendarError::Validation(format!(
                "unknown priority '{}' (expected low, normal or high)",
                s
            ))),
        }
    }
}

/// A task attached to a day of the month
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct DueDateEntry {
    /// Short title, never empty
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub completed: bool,
}

/// Everything needed to add a due date to a calendar.
///
/// Optional fields start at their defaults: empty description,
/// [`Priority::Normal`] and not completed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewDueDate {
    pub day: u32,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
}

impl NewDueDate {
    pub fn new(day: u32, title: impl Into<String>) -> Self {
        Self {
            day,
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            completed: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Split into the target day and the entry to store
    pub fn into_entry(self) -> (u32, DueDateEntry) {
        (
            self.day,
            DueDateEntry {
                title: self.title,
                description: self.description,
                priority: self.priority,
                completed: self.completed,
            },
        )
    }
}

/// Request body of the add-due-date endpoint.
///
/// Every field is optional here so that missing values can be reported as
/// validation errors instead of generic deserialization failures.
#[derive(Debug, Clone, Default, Deserialize, Eq, PartialEq)]
pub struct AddDueDateRequest {
    pub day: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
}

impl TryFrom<AddDueDateRequest> for NewDueDate {
    type Error = CalendarError;

    fn try_from(request: AddDueDateRequest) -> Result<Self, Self::Error> {
        let day = request
            .day
            .ok_or_else(|| CalendarError::Validation("day is required".to_string()))?;
        let day = u32::try_from(day).map_err(|_| CalendarError::OutOfRange {
            day,
            max: crate::calendar::MAX_DAY,
        })?;
        let title = request
            .title
            .ok_or_else(|| CalendarError::Validation("title is required".to_string()))?;
        let priority = match request.priority {
            Some(p) => p.parse()?,
            None => Priority::default(),
        };

        Ok(NewDueDate::new(day, title)
            .description(request.description.unwrap_or_default())
            .priority(priority)
            .completed(request.completed.unwrap_or(false)))
    }
}

/// Construction input for a [`MonthCalendar`](crate::calendar::MonthCalendar).
///
/// A missing month or year falls back to the host's local date.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CalendarConfig {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub primary_color: String,
    pub accent_color: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            month: None,
            year: None,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
        }
    }
}

/// Renderable snapshot of a calendar month, also its JSON representation
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct CalendarView {
    pub month: u32,
    pub year: i32,
    pub month_name: String,
    pub weeks: Vec<Week>,
    pub due_dates: BTreeMap<u32, Vec<DueDateEntry>>,
    pub primary_color: String,
    pub accent_color: String,
}

impl CalendarView {
    /// Entries stored for `day`, in insertion order
    pub fn entries_for(&self, day: u32) -> &[DueDateEntry] {
        self.due_dates.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Last day number that appears in the grid
    pub fn last_day(&self) -> u32 {
        self.weeks.iter().flatten().flatten().copied().max().unwrap_or(0)
    }
}
