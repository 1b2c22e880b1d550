use super::CalendarApi;
use crate::error::SyncResult;
use tracing::{info, warn};

/// Resolve the destination calendar for this run.
///
/// A configured ID is validated against the accessible calendar list and
/// returned unchanged when it is a member. An absent or unreachable ID
/// falls back to creating a fresh calendar. The create branch is not
/// idempotent: repeated runs without a usable configured ID each create
/// a new calendar.
pub async fn resolve_calendar<A: CalendarApi + ?Sized>(
    api: &A,
    configured: Option<&str>,
    calendar_summary: &str,
    timezone: &str,
) -> SyncResult<String> {
    if let Some(id) = configured {
        let accessible = api.list_calendars().await?;
        if accessible.iter().any(|calendar| calendar.id == id) {
            return Ok(id.to_string());
        }
        warn!(
            calendar_id = %id,
            "Configured calendar is not accessible, falling back to creating a new one"
        );
    }

    let created = api.create_calendar(calendar_summary, timezone).await?;
    info!(calendar_id = %created.id, "Created calendar");

    Ok(created.id)
}
