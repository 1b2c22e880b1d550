use super::models::{Calendar, CalendarEvent};
use super::token::TokenStore;
use super::CalendarApi;
use crate::error::{calendar_api_error, write_error, Error, SyncResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar v3 client backing the `CalendarApi` capability
pub struct GoogleCalendarClient {
    client: Client,
    tokens: TokenStore,
}

impl GoogleCalendarClient {
    pub fn new(tokens: TokenStore) -> Self {
        Self {
            client: Client::new(),
            tokens,
        }
    }

    async fn bearer(&self) -> SyncResult<String> {
        let access_token = self.tokens.access_token().await?;
        Ok(format!("Bearer {}", access_token))
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_calendars(&self) -> SyncResult<Vec<Calendar>> {
        let bearer = self.bearer().await?;
        let url = format!("{}/users/me/calendarList", CALENDAR_API_BASE);

        let response = self
            .client
            .get(&url)
            .header("Authorization", bearer)
            .send()
            .await
            .map_err(|e| Error::CalendarResolution(format!("Failed to list calendars: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(Error::CalendarResolution(format!(
                "Failed to list calendars: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: Value = response.json().await.map_err(|e| {
            Error::CalendarResolution(format!("Failed to parse calendar list: {}", e))
        })?;

        // An empty calendar list has no "items" key at all
        let items = response_data
            .get("items")
            .and_then(|i| i.as_array())
            .cloned()
            .unwrap_or_default();

        let calendars = items
            .iter()
            .filter_map(|item| {
                let id = item.get("id").and_then(|id| id.as_str())?.to_string();
                let summary = item
                    .get("summary")
                    .and_then(|s| s.as_str())
                    .map(|s| s.to_string());
                Some(Calendar { id, summary })
            })
            .collect();

        Ok(calendars)
    }

    async fn create_calendar(&self, summary: &str, timezone: &str) -> SyncResult<Calendar> {
        let bearer = self.bearer().await?;
        let url = format!("{}/calendars", CALENDAR_API_BASE);

        let body = json!({
            "summary": summary,
            "timeZone": timezone,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| write_error(&format!("Failed to create calendar: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(write_error(&format!(
                "Failed to create calendar: HTTP {} - {}",
                status, error_body
            )));
        }

        let created: Value = response
            .json()
            .await
            .map_err(|e| write_error(&format!("Failed to parse created calendar: {}", e)))?;

        let id = created
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| write_error("Created calendar has no id"))?
            .to_string();

        let summary = created
            .get("summary")
            .and_then(|s| s.as_str())
            .map(|s| s.to_string());

        Ok(Calendar { id, summary })
    }

    async fn list_events(&self, calendar_id: &str) -> SyncResult<Vec<CalendarEvent>> {
        let bearer = self.bearer().await?;
        let url_str = format!("{}/calendars/{}/events", CALENDAR_API_BASE, calendar_id);

        let mut url = Url::parse(&url_str)
            .map_err(|e| calendar_api_error(&format!("Failed to parse URL: {}", e)))?;
        url.query_pairs_mut().append_pair("maxResults", "2500");

        let response = self
            .client
            .get(url)
            .header("Authorization", bearer)
            .send()
            .await
            .map_err(|e| calendar_api_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(calendar_api_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: Value = response
            .json()
            .await
            .map_err(|e| calendar_api_error(&format!("Failed to parse events response: {}", e)))?;

        let items = response_data
            .get("items")
            .and_then(|i| i.as_array())
            .cloned()
            .unwrap_or_default();

        // Only all-day events can ever match a candidate; timed events are skipped
        let events = items
            .iter()
            .filter_map(|event| {
                let summary = event.get("summary").and_then(|s| s.as_str())?.to_string();
                let start_date = event
                    .get("start")
                    .and_then(|start| start.get("date"))
                    .and_then(|d| d.as_str())
                    .and_then(|d| d.parse::<NaiveDate>().ok())?;
                let end_date = event
                    .get("end")
                    .and_then(|end| end.get("date"))
                    .and_then(|d| d.as_str())
                    .and_then(|d| d.parse::<NaiveDate>().ok())?;

                Some(CalendarEvent {
                    summary,
                    start_date,
                    end_date,
                })
            })
            .collect();

        Ok(events)
    }

    async fn insert_event(&self, calendar_id: &str, event: &CalendarEvent) -> SyncResult<()> {
        let bearer = self.bearer().await?;
        let url = format!("{}/calendars/{}/events", CALENDAR_API_BASE, calendar_id);

        let body = json!({
            "summary": event.summary,
            "start": { "date": event.start_date.to_string() },
            "end": { "date": event.end_date.to_string() },
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| write_error(&format!("Failed to insert event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(write_error(&format!(
                "Failed to insert event: HTTP {} - {}",
                status, error_body
            )));
        }

        Ok(())
    }
}
