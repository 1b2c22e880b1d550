use crate::calendar::CalendarEvent;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Point-in-time snapshot of the destination calendar's events, fetched
/// once per run before any write. Membership is a linear scan with
/// structural equality; identity is never stronger than summary + start +
/// end.
#[derive(Debug, Default)]
pub struct ExistingEventIndex {
    events: Vec<CalendarEvent>,
}

impl ExistingEventIndex {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }

    pub fn contains(&self, event: &CalendarEvent) -> bool {
        self.events.iter().any(|existing| existing == event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Compute the minimal insert list for a set of candidate dates.
///
/// Candidates are deduplicated by date in first-seen order (the page may
/// repeat a date), turned into canonical all-day events, and kept only
/// when the snapshot holds no structurally equal event. Append-only:
/// existing events absent from the candidates are never touched.
pub fn plan_inserts(
    candidates: &[NaiveDate],
    existing: &ExistingEventIndex,
    summary: &str,
) -> Vec<CalendarEvent> {
    let mut seen = HashSet::new();
    let mut inserts = Vec::new();

    for &date in candidates {
        if !seen.insert(date) {
            continue;
        }

        let event = CalendarEvent::all_day(summary, date);
        if !existing.contains(&event) {
            inserts.push(event);
        }
    }

    inserts
}
