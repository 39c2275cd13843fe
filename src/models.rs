use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WeekStart {
    Sunday,
    #[default]
    Monday,
}

impl WeekStart {
    pub fn as_days_from_sunday(self) -> i64 {
        match self {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 1,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            WeekStart::Sunday => WeekStart::Monday,
            WeekStart::Monday => WeekStart::Sunday,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeekStart::Sunday => "Dom",
            WeekStart::Monday => "Seg",
        }
    }
}

impl TryFrom<u8> for WeekStart {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WeekStart::Sunday),
            1 => Ok(WeekStart::Monday),
            other => Err(format!("weekStartsOn must be 0 or 1, got {other}")),
        }
    }
}

impl From<WeekStart> for u8 {
    fn from(value: WeekStart) -> Self {
        match value {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 1,
        }
    }
}

/// Unknown settings are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub week_starts_on: WeekStart,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DayRecord {
    pub demandas: u64,
    pub acessos: u64,
}

/// The whole persisted document.
///
/// Missing top-level fields fall back to their defaults and unknown ones are
/// carried in `extra` so they survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppData {
    pub settings: Settings,
    pub history: BTreeMap<String, DayRecord>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Demandas,
    Acessos,
}

impl Counter {
    pub fn value_mut(self, record: &mut DayRecord) -> &mut u64 {
        match self {
            Counter::Demandas => &mut record.demandas,
            Counter::Acessos => &mut record.acessos,
        }
    }
}

impl std::str::FromStr for Counter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "demandas" => Ok(Counter::Demandas),
            "acessos" => Ok(Counter::Acessos),
            _ => Err("field must be 'demandas' or 'acessos'".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub field: String,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRow {
    pub data: String,
    pub demandas: u64,
    pub acessos: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WeekTotals {
    pub demandas: u64,
    pub acessos: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    pub today: String,
    pub today_display: String,
    pub week_start: String,
    pub week_start_display: String,
    pub week_starts_on: WeekStart,
    pub today_record: DayRecord,
    pub week_rows: Vec<DayRow>,
    pub week_totals: WeekTotals,
}
