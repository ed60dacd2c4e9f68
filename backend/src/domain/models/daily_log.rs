//! Domain model for daily care logs.
//!
//! Clients send a free-form `data` object next to the log `type`. Inside the
//! domain that pair becomes a [`LogPayload`], one variant per log type with a
//! fixed payload shape, so a bottle feed can never carry a diaper color.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::LogType;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreastSide {
    Left,
    Right,
    Both,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SleepData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BreastFeedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<BreastSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BottleFeedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_ml: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SolidFeedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DiaperData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MedicationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SymptomData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActivityData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

/// Type-specific payload of a daily log, keyed by the log type
#[derive(Debug, Clone, PartialEq)]
pub enum LogPayload {
    Sleep(SleepData),
    FeedBreast(BreastFeedData),
    FeedBottle(BottleFeedData),
    FeedSolid(SolidFeedData),
    DiaperWet(DiaperData),
    DiaperDirty(DiaperData),
    DiaperMixed(DiaperData),
    Medication(MedicationData),
    Symptom(SymptomData),
    Activity(ActivityData),
}

fn decode<T: DeserializeOwned>(data: Value) -> serde_json::Result<T> {
    serde_json::from_value(data)
}

impl LogPayload {
    /// Decode the untyped wire payload for `log_type`. A missing or `null`
    /// payload is an empty one.
    pub fn from_parts(log_type: LogType, data: Option<Value>) -> serde_json::Result<Self> {
        let data = match data {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(value) => value,
        };

        Ok(match log_type {
            LogType::Sleep => LogPayload::Sleep(decode(data)?),
            LogType::FeedBreast => LogPayload::FeedBreast(decode(data)?),
            LogType::FeedBottle => LogPayload::FeedBottle(decode(data)?),
            LogType::FeedSolid => LogPayload::FeedSolid(decode(data)?),
            LogType::DiaperWet => LogPayload::DiaperWet(decode(data)?),
            LogType::DiaperDirty => LogPayload::DiaperDirty(decode(data)?),
            LogType::DiaperMixed => LogPayload::DiaperMixed(decode(data)?),
            LogType::Medication => LogPayload::Medication(decode(data)?),
            LogType::Symptom => LogPayload::Symptom(decode(data)?),
            LogType::Activity => LogPayload::Activity(decode(data)?),
        })
    }

    pub fn log_type(&self) -> LogType {
        match self {
            LogPayload::Sleep(_) => LogType::Sleep,
            LogPayload::FeedBreast(_) => LogType::FeedBreast,
            LogPayload::FeedBottle(_) => LogType::FeedBottle,
            LogPayload::FeedSolid(_) => LogType::FeedSolid,
            LogPayload::DiaperWet(_) => LogType::DiaperWet,
            LogPayload::DiaperDirty(_) => LogType::DiaperDirty,
            LogPayload::DiaperMixed(_) => LogType::DiaperMixed,
            LogPayload::Medication(_) => LogType::Medication,
            LogPayload::Symptom(_) => LogType::Symptom,
            LogPayload::Activity(_) => LogType::Activity,
        }
    }

    /// Untyped form used on the wire and in the `data` column
    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            LogPayload::Sleep(data) => serde_json::to_value(data),
            LogPayload::FeedBreast(data) => serde_json::to_value(data),
            LogPayload::FeedBottle(data) => serde_json::to_value(data),
            LogPayload::FeedSolid(data) => serde_json::to_value(data),
            LogPayload::DiaperWet(data)
            | LogPayload::DiaperDirty(data)
            | LogPayload::DiaperMixed(data) => serde_json::to_value(data),
            LogPayload::Medication(data) => serde_json::to_value(data),
            LogPayload::Symptom(data) => serde_json::to_value(data),
            LogPayload::Activity(data) => serde_json::to_value(data),
        }
    }
}

/// A timestamped care event. When both are present, `ended_at >= started_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyLog {
    pub id: String,
    pub child_id: String,
    pub payload: LogPayload,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyLog {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn log_type(&self) -> LogType {
        self.payload.log_type()
    }

    /// Elapsed time rounded to whole minutes, when both ends are known
    pub fn duration_minutes(&self) -> Option<i64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => {
                let millis = (end - start).num_milliseconds() as f64;
                Some((millis / 60_000.0).round() as i64)
            }
            _ => None,
        }
    }
}
