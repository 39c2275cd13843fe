use crate::dates::{date_key, format_display_date, week_start};
use crate::export::{all_filename, to_csv, week_filename};
use crate::kv::KeyValueStore;
use crate::models::{AppData, Counter, DayRecord, DayRow, StateResponse, WeekStart, WeekTotals};
use crate::stats;
use crate::storage::{load_state, save_state};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Result of comparing the observed date with the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollover {
    Unchanged,
    Advanced { from: NaiveDate, to: NaiveDate },
}

/// The session's counters: the persisted document, the store it is written
/// to and the day currently being counted.
pub struct CounterState {
    store: Box<dyn KeyValueStore>,
    data: AppData,
    today: NaiveDate,
}

impl CounterState {
    pub fn open(store: Box<dyn KeyValueStore>, today: NaiveDate) -> Self {
        let data = load_state(store.as_ref());
        let mut state = Self { store, data, today };
        state.ensure_today();
        state.persist();
        state
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn week_starts_on(&self) -> WeekStart {
        self.data.settings.week_starts_on
    }

    pub fn week_start(&self) -> NaiveDate {
        week_start(self.today, self.week_starts_on())
    }

    pub fn week_rows(&self) -> Vec<DayRow> {
        stats::week_rows(&self.data.history, self.week_start(), self.today)
    }

    pub fn week_totals(&self) -> WeekTotals {
        stats::week_totals(&self.week_rows())
    }

    pub fn today_record(&self) -> DayRecord {
        stats::today_record(&self.data.history, self.today)
    }

    pub fn snapshot(&self) -> StateResponse {
        let week_start = self.week_start();
        let week_rows = self.week_rows();
        StateResponse {
            today: date_key(self.today),
            today_display: format_display_date(self.today),
            week_start: date_key(week_start),
            week_start_display: format_display_date(week_start),
            week_starts_on: self.week_starts_on(),
            today_record: self.today_record(),
            week_totals: stats::week_totals(&week_rows),
            week_rows,
        }
    }

    /// Adds `delta` to one of today's counters, never going below zero.
    pub fn update_today(&mut self, field: Counter, delta: i64) -> DayRecord {
        let key = date_key(self.today);
        let updated = {
            let entry = self.data.history.entry(key).or_default();
            let value = field.value_mut(entry);
            *value = if delta < 0 {
                value.saturating_sub(delta.unsigned_abs())
            } else {
                value.saturating_add(delta.unsigned_abs())
            };
            *entry
        };
        debug!(?field, delta, ?updated, "updated today");
        self.persist();
        updated
    }

    pub fn reset_today(&mut self) {
        self.data
            .history
            .insert(date_key(self.today), DayRecord::default());
        debug!(today = %self.today, "reset today");
        self.persist();
    }

    /// Zeroes the days of the current week up to today. Days without a
    /// record are left absent.
    pub fn reset_week(&mut self) {
        for date in stats::week_dates(self.week_start(), self.today) {
            if let Some(record) = self.data.history.get_mut(&date_key(date)) {
                *record = DayRecord::default();
            }
        }
        debug!(week_start = %self.week_start(), "reset week");
        self.persist();
    }

    pub fn toggle_week_start(&mut self) -> WeekStart {
        let next = self.week_starts_on().toggled();
        self.data.settings.week_starts_on = next;
        debug!(?next, "toggled week start");
        self.persist();
        next
    }

    /// Moves the active day forward when the wall clock has crossed midnight.
    pub fn roll_over(&mut self, observed: NaiveDate) -> Rollover {
        if observed == self.today {
            return Rollover::Unchanged;
        }

        let from = self.today;
        self.today = observed;
        self.ensure_today();
        self.persist();
        info!(%from, to = %observed, "day rolled over");
        Rollover::Advanced { from, to: observed }
    }

    pub fn week_csv(&self) -> (String, String) {
        let filename = week_filename(&date_key(self.week_start()), &date_key(self.today));
        (filename, to_csv(&self.week_rows()))
    }

    pub fn all_csv(&self) -> (String, String) {
        let filename = all_filename(&date_key(self.today));
        (filename, to_csv(&stats::all_rows(&self.data.history)))
    }

    fn ensure_today(&mut self) {
        self.data.history.entry(date_key(self.today)).or_default();
    }

    fn persist(&self) {
        save_state(self.store.as_ref(), &self.data);
    }
}
