mod client;
pub mod models;
mod resolver;
pub mod token;

pub use client::GoogleCalendarClient;
pub use models::{Calendar, CalendarEvent};
pub use resolver::resolve_calendar;

use crate::error::SyncResult;
use async_trait::async_trait;

/// Capability interface over the destination calendar service.
///
/// The sync core only talks to the calendar through this trait; the
/// concrete Google client lives in `client` and tests substitute a mock.
#[async_trait]
pub trait CalendarApi {
    /// Calendars reachable by the current credential
    async fn list_calendars(&self) -> SyncResult<Vec<Calendar>>;

    /// Create a new calendar and return it
    async fn create_calendar(&self, summary: &str, timezone: &str) -> SyncResult<Calendar>;

    /// Events currently present on a calendar
    async fn list_events(&self, calendar_id: &str) -> SyncResult<Vec<CalendarEvent>>;

    /// Insert a single event into a calendar
    async fn insert_event(&self, calendar_id: &str, event: &CalendarEvent) -> SyncResult<()>;
}
