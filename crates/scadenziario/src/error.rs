use thiserror::Error;

/// Errors reported by calendar operations.
///
/// None of these are fatal: callers get them back and the calendar state is
/// left untouched.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CalendarError {
    /// A required field is missing or malformed
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Day {day} is out of range (expected 1-{max})")]
    OutOfRange { day: i64, max: u32 },

    #[error("Invalid date: month {month} of year {year}")]
    InvalidDate { year: i32, month: u32 },
}
