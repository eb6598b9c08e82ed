use tracing::info;

use crate::calendar::MonthCalendar;
use crate::error::CalendarError;
use crate::types::{NewDueDate, Priority};

/// Demo due dates: (day, title, description, priority, completed)
const SAMPLES: &[(u32, &str, &str, Priority, bool)] = &[
    (
        5,
        "Project Proposal",
        "Submit project proposal to manager",
        Priority::High,
        false,
    ),
    (
        10,
        "Code Review",
        "Review pull requests from team",
        Priority::Normal,
        false,
    ),
    (
        15,
        "Team Meeting",
        "Weekly team sync-up meeting",
        Priority::Normal,
        false,
    ),
    (
        20,
        "Bug Fix Deadline",
        "Complete all reported bugs",
        Priority::High,
        false,
    ),
    (
        25,
        "Documentation",
        "Update API documentation",
        Priority::Low,
        true,
    ),
    (28, "Release", "Production release v2.0", Priority::High, false),
];

/// Seed the calendar with the demo due dates, returning how many were added
pub fn seed_samples(calendar: &mut MonthCalendar) -> Result<usize, CalendarError> {
    for &(day, title, description, priority, completed) in SAMPLES {
        calendar.add_due_date(
            NewDueDate::new(day, title)
                .description(description)
                .priority(priority)
                .completed(completed),
        )?;
    }

    info!(count = SAMPLES.len(), "Seeded sample due dates");
    Ok(SAMPLES.len())
}
