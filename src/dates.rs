//! Calendar helpers anchored to the São Paulo timezone.
//!
//! Days are identified by `YYYY-MM-DD` keys. Only "today" depends on the
//! wall clock; everything else is plain calendar arithmetic on those keys.

use crate::models::WeekStart;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

pub const TZ: Tz = chrono_tz::America::Sao_Paulo;

const KEY_FORMAT: &str = "%Y-%m-%d";

pub fn today_in_tz() -> NaiveDate {
    today_in_tz_at(Utc::now())
}

pub fn today_in_tz_at(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&TZ).date_naive()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(KEY_FORMAT).to_string()
}

/// Parses a canonical date-key. Anything other than a zero-padded
/// `YYYY-MM-DD` is rejected.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    if key.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(key, KEY_FORMAT).ok()
}

/// `DD/MM/YYYY`, the order Brazilian users read dates in.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn week_start(date: NaiveDate, starts_on: WeekStart) -> NaiveDate {
    let dow = i64::from(date.weekday().num_days_from_sunday());
    let diff = (dow - starts_on.as_days_from_sunday() + 7) % 7;
    date - Duration::days(diff)
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

pub fn get_week_start_key(key: &str, starts_on: WeekStart) -> Option<String> {
    parse_date_key(key).map(|date| date_key(week_start(date, starts_on)))
}

pub fn add_days_key(key: &str, days: i64) -> Option<String> {
    parse_date_key(key).map(|date| date_key(add_days(date, days)))
}
