use crate::error::{config_error, env_error, SyncResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Default events page to scrape
pub const DEFAULT_EVENTS_URL: &str = "https://www.chillfactore.com/plan-your-visit/events";

/// Default year composed into scraped dates (the page only carries day and month)
pub const DEFAULT_EVENT_YEAR: i32 = 2024;

/// Default label that marks a qualifying session and names its events
pub const DEFAULT_EVENT_SUMMARY: &str = "Moguls";

/// Default summary for auto-created calendars
pub const DEFAULT_CALENDAR_SUMMARY: &str = "Dates of moguls";

/// Default timezone for auto-created calendars
pub const DEFAULT_TIMEZONE: &str = "Europe/London";

/// Default location of the persisted OAuth token
pub const DEFAULT_TOKEN_PATH: &str = "token.json";

/// Default upper bound on the events page fetch, in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

/// Main configuration structure for the sync tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Destination calendar ID; absent triggers calendar auto-creation
    pub calendar_id: Option<String>,
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// URL of the events page to scrape
    pub events_url: String,
    /// Year composed into every scraped date
    pub event_year: i32,
    /// Session label: qualifying marker on the page and summary of inserted events
    pub event_summary: String,
    /// Summary given to auto-created calendars
    pub calendar_summary: String,
    /// Timezone given to auto-created calendars
    pub timezone: String,
    /// Where the OAuth token cache is persisted
    pub token_path: String,
    /// Upper bound on the events page fetch, in seconds
    pub fetch_timeout_secs: u64,
}

/// Optional per-field overrides loaded from `config/mogulsync.toml`
#[derive(Debug, Default, Deserialize)]
struct Overrides {
    calendar_id: Option<String>,
    events_url: Option<String>,
    event_year: Option<i32>,
    event_summary: Option<String>,
    calendar_summary: Option<String>,
    timezone: Option<String>,
    token_path: Option<String>,
    fetch_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> SyncResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;

        // Optional destination calendar; empty counts as absent
        let calendar_id = env::var("MOGULS_CALENDAR_ID")
            .ok()
            .filter(|id| !id.is_empty());

        let events_url = env::var("EVENTS_URL").unwrap_or_else(|_| String::from(DEFAULT_EVENTS_URL));

        let event_year = match env::var("EVENT_YEAR") {
            Ok(value) => value
                .parse::<i32>()
                .map_err(|_| config_error("Invalid EVENT_YEAR format"))?,
            Err(_) => DEFAULT_EVENT_YEAR,
        };

        let event_summary =
            env::var("EVENT_SUMMARY").unwrap_or_else(|_| String::from(DEFAULT_EVENT_SUMMARY));
        let calendar_summary =
            env::var("CALENDAR_SUMMARY").unwrap_or_else(|_| String::from(DEFAULT_CALENDAR_SUMMARY));
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));
        let token_path =
            env::var("TOKEN_PATH").unwrap_or_else(|_| String::from(DEFAULT_TOKEN_PATH));

        let fetch_timeout_secs = match env::var("FETCH_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .map_err(|_| config_error("Invalid FETCH_TIMEOUT_SECS format"))?,
            Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        let mut config = Config {
            calendar_id,
            google_client_id,
            google_client_secret,
            events_url,
            event_year,
            event_summary,
            calendar_summary,
            timezone,
            token_path,
            fetch_timeout_secs,
        };

        // Merge overrides from file if it exists
        if let Ok(content) = fs::read_to_string("config/mogulsync.toml") {
            let overrides: Overrides = toml::from_str(&content)?;
            config.apply(overrides);
        }

        config.validate()?;

        Ok(config)
    }

    fn apply(&mut self, overrides: Overrides) {
        if overrides.calendar_id.is_some() {
            self.calendar_id = overrides.calendar_id;
        }
        if let Some(events_url) = overrides.events_url {
            self.events_url = events_url;
        }
        if let Some(event_year) = overrides.event_year {
            self.event_year = event_year;
        }
        if let Some(event_summary) = overrides.event_summary {
            self.event_summary = event_summary;
        }
        if let Some(calendar_summary) = overrides.calendar_summary {
            self.calendar_summary = calendar_summary;
        }
        if let Some(timezone) = overrides.timezone {
            self.timezone = timezone;
        }
        if let Some(token_path) = overrides.token_path {
            self.token_path = token_path;
        }
        if let Some(fetch_timeout_secs) = overrides.fetch_timeout_secs {
            self.fetch_timeout_secs = fetch_timeout_secs;
        }
    }

    fn validate(&self) -> SyncResult<()> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.timezone)))?;
        Ok(())
    }
}
