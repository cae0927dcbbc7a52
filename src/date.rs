//! Resolution of the day-of-year ("Julian date") found on boarding passes to a
//! calendar date. The year is not encoded, so it is guessed either from the
//! current time or from a timestamp at which the pass is known to have been
//! valid.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Boarding passes may be issued this many days ahead of the flight.
pub const FUTURE_TOLERANCE_DAYS: i64 = 3;

/// Years searched backwards. Leap years can be up to eight years apart.
pub const YEAR_SEARCH_SPAN: i32 = 8;

fn valid_ordinal(ordinal: u16) -> bool {
    (1..=366).contains(&ordinal)
}

/// Most recent date with the given day of year that is not more than
/// [`FUTURE_TOLERANCE_DAYS`] after `now`.
pub fn resolve_from_now(ordinal: u16, now: DateTime<Utc>) -> Option<NaiveDate> {
    if !valid_ordinal(ordinal) {
        return None;
    }
    let latest = (now + Duration::days(FUTURE_TOLERANCE_DAYS)).date_naive();
    (0..YEAR_SEARCH_SPAN)
        .map(|back| latest.year() - back)
        .filter_map(|year| NaiveDate::from_yo_opt(year, ordinal as u32))
        .find(|date| *date <= latest)
}

/// Date with the given day of year closest to `reference`, looking at the
/// reference year and the years on either side of it.
pub fn resolve_from_reference(ordinal: u16, reference: DateTime<Utc>) -> Option<NaiveDate> {
    if !valid_ordinal(ordinal) {
        return None;
    }
    let reference = reference.date_naive();
    let year = reference.year();
    [year, year - 1, year + 1]
        .iter()
        .filter_map(|year| NaiveDate::from_yo_opt(*year, ordinal as u32))
        .min_by_key(|date| (*date - reference).num_days().abs())
}

/// Resolves a day of year using `reference` when present, `now` otherwise.
pub fn resolve_flight_date(
    ordinal: u16,
    reference: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<NaiveDate> {
    match reference {
        Some(reference) => resolve_from_reference(ordinal, reference),
        None => resolve_from_now(ordinal, now),
    }
}
