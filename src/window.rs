//! Chart windowing over the most recent readings.
//!
//! Input is the store snapshot, newest first. Output is at most
//! `max_display` points, oldest first.

use crate::models::Reading;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_FETCH: usize = 10;
pub const DEFAULT_MAX_DISPLAY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrder {
    /// Trust the order the snapshot was delivered in.
    #[default]
    Delivery,
    /// Re-sort the fetched readings by `recorded_at` (ties by id).
    RecordedAt,
}

impl SeriesOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "delivery" => Some(Self::Delivery),
            "recorded_at" | "recorded-at" | "timestamp" => Some(Self::RecordedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSettings {
    pub max_fetch: usize,
    pub max_display: usize,
    pub order: SeriesOrder,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            max_fetch: DEFAULT_MAX_FETCH,
            max_display: DEFAULT_MAX_DISPLAY,
            order: SeriesOrder::Delivery,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub id: u64,
    pub label: String,
    pub value: i64,
    pub recorded_at: DateTime<Utc>,
}

impl SeriesPoint {
    fn from_reading(reading: &Reading) -> Self {
        Self {
            id: reading.id,
            label: time_label(reading.recorded_at),
            value: reading.value,
            recorded_at: reading.recorded_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|point| point.label.clone()).collect()
    }

    pub fn values(&self) -> Vec<i64> {
        self.points.iter().map(|point| point.value).collect()
    }
}

pub fn window(readings: &[Reading], max_fetch: usize, max_display: usize) -> Series {
    window_with(
        readings,
        WindowSettings {
            max_fetch,
            max_display,
            order: SeriesOrder::Delivery,
        },
    )
}

pub fn window_with(readings: &[Reading], settings: WindowSettings) -> Series {
    let mut fetched: Vec<&Reading> = readings.iter().take(settings.max_fetch).collect();
    fetched.reverse();

    if settings.order == SeriesOrder::RecordedAt {
        // stable, so equal keys keep delivery order
        fetched.sort_by_key(|reading| (reading.recorded_at, reading.id));
    }

    let skip = fetched.len().saturating_sub(settings.max_display);
    Series {
        points: fetched[skip..]
            .iter()
            .map(|reading| SeriesPoint::from_reading(reading))
            .collect(),
    }
}

fn time_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}
