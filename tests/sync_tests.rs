use async_trait::async_trait;
use chrono::NaiveDate;
use mogulsync::calendar::{Calendar, CalendarApi, CalendarEvent};
use mogulsync::config::Config;
use mogulsync::error::{write_error, Error, SyncResult};
use mogulsync::sync;
use std::sync::Mutex;

/// Cut-down events page: two distinct Moguls dates, one repeated date and
/// one unrelated session type
const EVENTS_PAGE: &str = r#"
<html><body>
    <figure class="event-card">
        <img src="/media/moguls.jpg" alt="Moguls">
        <figcaption><span data-day="5" data-month="Jan">Sun 5 Jan</span></figcaption>
    </figure>
    <figure class="event-card">
        <img src="/media/moguls.jpg" alt="Moguls">
        <figcaption><span data-day="5" data-month="Jan">Sun 5 Jan</span></figcaption>
    </figure>
    <figure class="event-card">
        <img src="/media/freestyle.jpg" alt="Freestyle Night">
        <figcaption><span data-day="7" data-month="Jan">Tue 7 Jan</span></figcaption>
    </figure>
    <figure class="event-card">
        <img src="/media/moguls.jpg" alt="Moguls">
        <figcaption><span data-day="10" data-month="Feb">Mon 10 Feb</span></figcaption>
    </figure>
    <figure class="event-card">
        <img src="/media/moguls.jpg" alt="Moguls">
        <figcaption><span data-day="3" data-month="Mar">Mon 3 Mar</span></figcaption>
    </figure>
</body></html>
"#;

const CREATED_ID: &str = "created-cal-1";

/// Mock implementation of the calendar collaborator that records every call
#[derive(Default)]
struct MockCalendarApi {
    accessible: Vec<Calendar>,
    events: Mutex<Vec<CalendarEvent>>,
    list_calendar_calls: Mutex<usize>,
    created: Mutex<Vec<(String, String)>>,
    events_listed_for: Mutex<Vec<String>>,
    inserted_into: Mutex<Vec<String>>,
    fail_insert_on: Option<NaiveDate>,
}

impl MockCalendarApi {
    fn with_accessible(ids: &[&str]) -> Self {
        Self {
            accessible: ids
                .iter()
                .map(|id| Calendar {
                    id: id.to_string(),
                    summary: None,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn with_existing_events(self, events: Vec<CalendarEvent>) -> Self {
        *self.events.lock().unwrap() = events;
        self
    }

    fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    fn event_dates(&self) -> Vec<NaiveDate> {
        self.events.lock().unwrap().iter().map(|e| e.start_date).collect()
    }
}

#[async_trait]
impl CalendarApi for MockCalendarApi {
    async fn list_calendars(&self) -> SyncResult<Vec<Calendar>> {
        *self.list_calendar_calls.lock().unwrap() += 1;
        Ok(self.accessible.clone())
    }

    async fn create_calendar(&self, summary: &str, timezone: &str) -> SyncResult<Calendar> {
        self.created
            .lock()
            .unwrap()
            .push((summary.to_string(), timezone.to_string()));
        Ok(Calendar {
            id: CREATED_ID.to_string(),
            summary: Some(summary.to_string()),
        })
    }

    async fn list_events(&self, calendar_id: &str) -> SyncResult<Vec<CalendarEvent>> {
        self.events_listed_for
            .lock()
            .unwrap()
            .push(calendar_id.to_string());
        Ok(self.events.lock().unwrap().clone())
    }

    async fn insert_event(&self, calendar_id: &str, event: &CalendarEvent) -> SyncResult<()> {
        if self.fail_insert_on == Some(event.start_date) {
            return Err(write_error("Failed to insert event: HTTP 500"));
        }
        self.inserted_into
            .lock()
            .unwrap()
            .push(calendar_id.to_string());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn test_config(calendar_id: Option<&str>) -> Config {
    Config {
        calendar_id: calendar_id.map(String::from),
        google_client_id: String::new(),
        google_client_secret: String::new(),
        events_url: String::new(),
        event_year: 2024,
        event_summary: "Moguls".to_string(),
        calendar_summary: "Dates of moguls".to_string(),
        timezone: "Europe/London".to_string(),
        token_path: "token.json".to_string(),
        fetch_timeout_secs: 5,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn absent_calendar_id_creates_one_without_consulting_the_accessible_set() {
    let api = MockCalendarApi::with_accessible(&["some-other-cal"]);
    let config = test_config(None);

    let report = sync::sync_markup(EVENTS_PAGE, &api, &config).await.unwrap();

    assert_eq!(*api.list_calendar_calls.lock().unwrap(), 0);
    assert_eq!(api.created_count(), 1);
    assert_eq!(report.calendar_id, CREATED_ID);
    assert_eq!(*api.events_listed_for.lock().unwrap(), vec![CREATED_ID]);
}

#[tokio::test]
async fn inaccessible_calendar_id_falls_back_to_exactly_one_create() {
    let api = MockCalendarApi::with_accessible(&["some-other-cal"]);
    let config = test_config(Some("bad-id"));

    let report = sync::sync_markup(EVENTS_PAGE, &api, &config).await.unwrap();

    assert_eq!(api.created_count(), 1);
    assert_eq!(
        *api.created.lock().unwrap(),
        vec![("Dates of moguls".to_string(), "Europe/London".to_string())]
    );

    // The created calendar is used for everything that follows
    assert_eq!(report.calendar_id, CREATED_ID);
    assert_eq!(*api.events_listed_for.lock().unwrap(), vec![CREATED_ID]);
    assert!(api
        .inserted_into
        .lock()
        .unwrap()
        .iter()
        .all(|id| id == CREATED_ID));
}

#[tokio::test]
async fn accessible_calendar_id_is_used_unchanged() {
    let api = MockCalendarApi::with_accessible(&["good-id"]);
    let config = test_config(Some("good-id"));

    let report = sync::sync_markup(EVENTS_PAGE, &api, &config).await.unwrap();

    assert_eq!(api.created_count(), 0);
    assert_eq!(report.calendar_id, "good-id");
}

#[tokio::test]
async fn repeated_page_dates_collapse_to_a_single_event() {
    let api = MockCalendarApi::with_accessible(&["good-id"]);
    let config = test_config(Some("good-id"));

    let report = sync::sync_markup(EVENTS_PAGE, &api, &config).await.unwrap();

    // Five figures, one non-qualifying, one duplicate date
    assert_eq!(report.candidate_dates, 4);
    assert_eq!(report.inserted, 3);
    assert_eq!(
        api.event_dates(),
        vec![date(2024, 1, 5), date(2024, 2, 10), date(2024, 3, 3)]
    );
}

#[tokio::test]
async fn dates_already_on_the_calendar_are_skipped() {
    let api = MockCalendarApi::with_accessible(&["good-id"]).with_existing_events(vec![
        CalendarEvent::all_day("Moguls", date(2024, 1, 5)),
        CalendarEvent::all_day("Moguls", date(2024, 2, 10)),
    ]);
    let config = test_config(Some("good-id"));

    let report = sync::sync_markup(EVENTS_PAGE, &api, &config).await.unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(
        api.event_dates(),
        vec![date(2024, 1, 5), date(2024, 2, 10), date(2024, 3, 3)]
    );
}

#[tokio::test]
async fn a_second_full_run_inserts_nothing() {
    let api = MockCalendarApi::with_accessible(&["good-id"]);
    let config = test_config(Some("good-id"));

    let first = sync::sync_markup(EVENTS_PAGE, &api, &config).await.unwrap();
    let second = sync::sync_markup(EVENTS_PAGE, &api, &config).await.unwrap();

    assert_eq!(first.inserted, 3);
    assert_eq!(second.inserted, 0);
    assert_eq!(api.event_dates().len(), 3);
}

#[tokio::test]
async fn insert_failure_aborts_the_remaining_inserts() {
    let mut api = MockCalendarApi::with_accessible(&["good-id"]);
    api.fail_insert_on = Some(date(2024, 2, 10));
    let config = test_config(Some("good-id"));

    let result = sync::sync_markup(EVENTS_PAGE, &api, &config).await;

    assert!(matches!(result, Err(Error::Write(_))));
    // The first insert landed, the failing one and everything after did not
    assert_eq!(api.event_dates(), vec![date(2024, 1, 5)]);
}

#[tokio::test]
async fn malformed_markup_fails_before_any_calendar_access() {
    let api = MockCalendarApi::with_accessible(&["good-id"]);
    let config = test_config(Some("good-id"));
    let markup = r#"<figure><img alt="Moguls" data-day="xx" data-month="Jan"></figure>"#;

    let result = sync::sync_markup(markup, &api, &config).await;

    assert!(matches!(result, Err(Error::Parse(_))));
    assert_eq!(*api.list_calendar_calls.lock().unwrap(), 0);
    assert!(api.events_listed_for.lock().unwrap().is_empty());
    assert!(api.event_dates().is_empty());
}
