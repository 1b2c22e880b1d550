use crate::calendar::token::TokenStore;
use crate::calendar::{resolve_calendar, CalendarApi, GoogleCalendarClient};
use crate::config::Config;
use crate::error::{fetch_error, SyncResult};
use crate::extract;
use crate::fetch;
use crate::reconcile::{self, ExistingEventIndex};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::info;

/// What a completed run did
#[derive(Debug)]
pub struct SyncReport {
    pub calendar_id: String,
    pub candidate_dates: usize,
    pub inserted: usize,
}

/// Run one full sync against the live page and the live calendar API
pub async fn run_once(config: &Config) -> SyncResult<SyncReport> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .build()
        .map_err(|e| fetch_error(&format!("Failed to build HTTP client: {}", e)))?;

    let markup = fetch::fetch_events_page(&client, &config.events_url).await?;

    let api = GoogleCalendarClient::new(TokenStore::new(config));
    sync_markup(&markup, &api, config).await
}

/// Sync already-fetched markup against a calendar collaborator.
///
/// Sequence: extract dates, resolve the destination calendar, snapshot its
/// events, plan the inserts, then apply them one at a time in list order.
/// The snapshot is taken once before any write; the first failed insert
/// aborts the rest of the run.
pub async fn sync_markup<A: CalendarApi>(
    markup: &str,
    api: &A,
    config: &Config,
) -> SyncResult<SyncReport> {
    // The parsed document is not Send, so extraction finishes before the
    // first await
    let dates = {
        let document = Html::parse_document(markup);
        extract::extract_dates(&document, config.event_year, &config.event_summary)?
    };
    info!(count = dates.len(), "Extracted candidate session dates");

    let calendar_id = resolve_calendar(
        api,
        config.calendar_id.as_deref(),
        &config.calendar_summary,
        &config.timezone,
    )
    .await?;

    let existing = ExistingEventIndex::new(api.list_events(&calendar_id).await?);
    info!(
        calendar_id = %calendar_id,
        existing = existing.len(),
        "Fetched existing events"
    );

    let inserts = reconcile::plan_inserts(&dates, &existing, &config.event_summary);
    if inserts.is_empty() {
        info!("Calendar is already up to date");
    }

    let mut inserted = 0;
    for event in &inserts {
        api.insert_event(&calendar_id, event).await?;
        inserted += 1;
        info!(date = %event.start_date, "Inserted event");
    }

    Ok(SyncReport {
        calendar_id,
        candidate_dates: dates.len(),
        inserted,
    })
}
