use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::VecDeque;

/// Number of days kept in the history
pub const MAX_DAILY_ENTRIES: usize = 7;

/// Predicted bytes saved on one local day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySaving {
    /// Local midnight of the day
    pub day: DateTime<Utc>,
    pub saving: u64,
}

impl DailySaving {
    pub fn new(day: DateTime<Utc>, saving: u64) -> Self {
        Self { day, saving }
    }

    /// `{day: seconds since epoch, saving: bytes}`, both as JSON doubles
    pub fn to_value(&self) -> Value {
        json!({
            "day": self.day.timestamp_millis() as f64 / 1000.0,
            "saving": self.saving as f64,
        })
    }

    /// Parse one persisted record; `None` if a field is missing or not a number
    pub fn from_value(record: &Value) -> Option<Self> {
        let day = record.get("day")?.as_f64()?;
        let saving = record.get("saving")?.as_f64()?;
        if !day.is_finite() || !saving.is_finite() {
            return None;
        }
        let day = DateTime::from_timestamp_millis((day * 1000.0).round() as i64)?;
        Some(Self {
            day,
            // Saturating float-to-int cast: negative values become 0
            saving: saving as u64,
        })
    }
}

/// Load the persisted history, newest first
///
/// Malformed records are skipped, as are records that are not strictly older
/// than the previous kept one. At most [`MAX_DAILY_ENTRIES`] are returned.
pub fn load_daily_savings(list: Option<&Value>) -> VecDeque<DailySaving> {
    let mut daily = VecDeque::new();
    let Some(records) = list.and_then(Value::as_array) else {
        return daily;
    };

    for record in records {
        if daily.len() == MAX_DAILY_ENTRIES {
            break;
        }
        let Some(entry) = DailySaving::from_value(record) else {
            tracing::debug!("Skipping malformed daily savings record {}", record);
            continue;
        };
        if let Some(previous) = daily.back() {
            if entry.day >= previous.day {
                tracing::debug!("Skipping out-of-order daily savings record {}", record);
                continue;
            }
        }
        daily.push_back(entry);
    }
    daily
}

/// Persisted form of the history
pub fn serialize_daily_savings(daily: &VecDeque<DailySaving>) -> Value {
    Value::Array(daily.iter().map(DailySaving::to_value).collect())
}
