use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// All-day calendar event; two events are the same logical event iff
/// summary, start and end are all equal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CalendarEvent {
    /// Canonical single-day all-day event for a session date
    pub fn all_day(summary: &str, date: NaiveDate) -> Self {
        Self {
            summary: summary.to_string(),
            start_date: date,
            end_date: date,
        }
    }
}

/// A calendar reachable by the current credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub summary: Option<String>,
}
