use crate::dates::{add_days, date_key};
use crate::models::{DayRecord, DayRow, WeekTotals};
use chrono::NaiveDate;
use std::collections::BTreeMap;

const WEEK_LEN: i64 = 7;

/// Days of the week starting at `week_start`, stopping at `today` so a week
/// in progress only shows elapsed days. Missing days read as zero.
pub fn week_rows(
    history: &BTreeMap<String, DayRecord>,
    week_start: NaiveDate,
    today: NaiveDate,
) -> Vec<DayRow> {
    week_dates(week_start, today)
        .map(|date| {
            let key = date_key(date);
            let record = history.get(&key).copied().unwrap_or_default();
            to_row(key, record)
        })
        .collect()
}

pub fn week_dates(week_start: NaiveDate, today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..WEEK_LEN)
        .map(move |offset| add_days(week_start, offset))
        .take_while(move |date| *date <= today)
}

pub fn week_totals(rows: &[DayRow]) -> WeekTotals {
    rows.iter().fold(WeekTotals::default(), |acc, row| WeekTotals {
        demandas: acc.demandas.saturating_add(row.demandas),
        acessos: acc.acessos.saturating_add(row.acessos),
    })
}

pub fn today_record(history: &BTreeMap<String, DayRecord>, today: NaiveDate) -> DayRecord {
    history.get(&date_key(today)).copied().unwrap_or_default()
}

/// Every stored day, ascending by date-key.
pub fn all_rows(history: &BTreeMap<String, DayRecord>) -> Vec<DayRow> {
    history
        .iter()
        .map(|(key, record)| to_row(key.clone(), *record))
        .collect()
}

fn to_row(data: String, record: DayRecord) -> DayRow {
    DayRow {
        data,
        demandas: record.demandas,
        acessos: record.acessos,
    }
}
