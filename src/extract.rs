use crate::error::{parse_error, SyncResult};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

/// Extract the session dates advertised on the events page.
///
/// A figure qualifies when it (or any descendant) carries an `alt`
/// attribute equal to `label`. Day and month come from `data-day` and
/// `data-month` attributes anywhere inside the figure; the page never
/// carries a year, so the configured one is composed in. A qualifying
/// figure with missing or malformed tokens fails the whole extraction
/// rather than silently under-reporting dates.
///
/// Output preserves document order and keeps duplicates; collapsing them
/// is the reconciler's job.
pub fn extract_dates(document: &Html, year: i32, label: &str) -> SyncResult<Vec<NaiveDate>> {
    let figure_selector =
        Selector::parse("figure").map_err(|e| parse_error(&format!("Invalid selector: {}", e)))?;
    let descendant_selector =
        Selector::parse("*").map_err(|e| parse_error(&format!("Invalid selector: {}", e)))?;

    let mut dates = Vec::new();

    for figure in document.select(&figure_selector) {
        if !is_qualifying(figure, &descendant_selector, label) {
            continue;
        }

        let day = find_attr(figure, &descendant_selector, "data-day").ok_or_else(|| {
            parse_error(&format!("Qualifying {} figure has no data-day attribute", label))
        })?;
        let month = find_attr(figure, &descendant_selector, "data-month").ok_or_else(|| {
            parse_error(&format!("Qualifying {} figure has no data-month attribute", label))
        })?;

        dates.push(compose_date(year, month, day)?);
    }

    Ok(dates)
}

/// Whether a figure advertises the target session type
fn is_qualifying(figure: ElementRef, descendants: &Selector, label: &str) -> bool {
    figure.value().attr("alt") == Some(label)
        || figure
            .select(descendants)
            .any(|element| element.value().attr("alt") == Some(label))
}

/// First occurrence of an attribute on the figure or any descendant,
/// whatever tag it happens to sit on
fn find_attr<'a>(figure: ElementRef<'a>, descendants: &Selector, name: &str) -> Option<&'a str> {
    if let Some(value) = figure.value().attr(name) {
        return Some(value);
    }
    figure
        .select(descendants)
        .find_map(|element| element.value().attr(name))
}

/// Compose a date from the page's day/month tokens and the configured year.
/// `%b` validates the three-letter month abbreviation and the day range.
fn compose_date(year: i32, month: &str, day: &str) -> SyncResult<NaiveDate> {
    let composed = format!("{}-{}-{}", year, month, day);
    NaiveDate::parse_from_str(&composed, "%Y-%b-%d")
        .map_err(|e| parse_error(&format!("Invalid event date '{} {}': {}", day, month, e)))
}
