use crate::classify::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MealContext {
    #[default]
    Fasting,
    AfterMeal,
}

impl MealContext {
    /// Unknown tags fall back to `AfterMeal`, the widest target range.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "fasting" => MealContext::Fasting,
            _ => MealContext::AfterMeal,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            MealContext::Fasting => "fasting",
            MealContext::AfterMeal => "afterMeal",
        }
    }
}

impl<'de> Deserialize<'de> for MealContext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(MealContext::from_tag(&tag))
    }
}

/// A validated reading waiting for a store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReading {
    pub value: i64,
    pub context: MealContext,
    pub recorded_at: DateTime<Utc>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub id: u64,
    pub value: i64,
    pub context: MealContext,
    pub recorded_at: DateTime<Utc>,
    /// Classification computed when the reading was saved.
    pub status: Status,
}

impl Reading {
    pub fn from_new(id: u64, new: NewReading) -> Self {
        Self {
            id,
            value: new.value,
            context: new.context,
            recorded_at: new.recorded_at,
            status: new.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreData {
    pub last_id: u64,
    pub readings: Vec<Reading>,
}

#[derive(Debug, Deserialize)]
pub struct SaveReadingRequest {
    pub value: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub recorded_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyQuery {
    pub value: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogItem {
    #[serde(flatten)]
    pub reading: Reading,
    /// Classification under the scheme active right now.
    pub current: Status,
}

#[derive(Debug, Serialize)]
pub struct ReadingsResponse {
    pub readings: Vec<LogItem>,
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
    pub enough_data: bool,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub value: i64,
    pub context: MealContext,
    #[serde(flatten)]
    pub status: Status,
}

#[derive(Debug, Deserialize)]
pub struct PremiumRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct PremiumResponse {
    pub premium: bool,
}
