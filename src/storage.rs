use crate::kv::KeyValueStore;
use crate::models::{AppData, DayRecord, Settings, WeekStart};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::error;

pub const STORAGE_KEY: &str = "detran_counter_v1";

const WEEK_STARTS_ON: &str = "weekStartsOn";

/// Loads the persisted document, falling back to defaults when it is
/// missing, unreadable or not a JSON object.
///
/// Fields are merged one by one over the defaults: a bad setting keeps its
/// default and a bad day record is dropped, without losing the rest.
pub fn load_state(store: &dyn KeyValueStore) -> AppData {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return AppData::default(),
        Err(err) => {
            error!("failed to load stored state: {err}");
            return AppData::default();
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(fields)) => merge_over_defaults(fields),
        Ok(other) => {
            error!("stored state is not an object: {other}");
            AppData::default()
        }
        Err(err) => {
            error!("failed to parse stored state: {err}");
            AppData::default()
        }
    }
}

fn merge_over_defaults(mut fields: Map<String, Value>) -> AppData {
    let settings = fields
        .remove("settings")
        .map(settings_from_value)
        .unwrap_or_default();
    let history = fields
        .remove("history")
        .map(history_from_value)
        .unwrap_or_default();

    AppData {
        settings,
        history,
        extra: fields,
    }
}

fn settings_from_value(value: Value) -> Settings {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            error!("ignoring stored settings that are not an object: {other}");
            return Settings::default();
        }
    };

    let week_starts_on = match fields.remove(WEEK_STARTS_ON) {
        Some(raw) => WeekStart::deserialize(&raw).unwrap_or_else(|err| {
            error!("ignoring stored {WEEK_STARTS_ON} {raw}: {err}");
            WeekStart::default()
        }),
        None => WeekStart::default(),
    };

    Settings {
        week_starts_on,
        extra: fields,
    }
}

fn history_from_value(value: Value) -> BTreeMap<String, DayRecord> {
    let days = match value {
        Value::Object(days) => days,
        other => {
            error!("ignoring stored history that is not an object: {other}");
            return BTreeMap::new();
        }
    };

    days.into_iter()
        .filter_map(|(key, raw)| match DayRecord::deserialize(&raw) {
            Ok(record) => Some((key, record)),
            Err(err) => {
                error!(day = %key, "dropping unreadable day record {raw}: {err}");
                None
            }
        })
        .collect()
}

/// Writes the document back. Failures are logged and otherwise ignored; the
/// in-memory copy stays authoritative for the session.
pub fn save_state(store: &dyn KeyValueStore, data: &AppData) -> bool {
    let payload = match serde_json::to_string(data) {
        Ok(payload) => payload,
        Err(err) => {
            error!("failed to serialize state: {err}");
            return false;
        }
    };

    match store.set(STORAGE_KEY, &payload) {
        Ok(()) => true,
        Err(err) => {
            error!("failed to save state: {err}");
            false
        }
    }
}
