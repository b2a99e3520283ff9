use crate::classify::ThresholdScheme;
use crate::errors::ValidationError;
use crate::models::{MealContext, NewReading};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// A parsed value that has not been given a context or timestamp yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingDraft {
    pub value: i64,
}

impl ReadingDraft {
    /// Pairs the draft with the selected context and time and classifies it.
    pub fn into_new_reading(
        self,
        context: MealContext,
        recorded_at: DateTime<Utc>,
        scheme: ThresholdScheme,
    ) -> NewReading {
        NewReading {
            value: self.value,
            context,
            recorded_at,
            status: scheme.classify(self.value, context),
        }
    }
}

/// No range check: zero and negative values are accepted.
pub fn validate_reading(raw: &str) -> Result<ReadingDraft, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyOrNonNumeric);
    }
    trimmed
        .parse::<i64>()
        .map(|value| ReadingDraft { value })
        .map_err(|_| ValidationError::EmptyOrNonNumeric)
}

/// Accepts RFC 3339 or an HTML `datetime-local` value in local time.
/// Empty input means "now".
pub fn parse_recorded_at(raw: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>, ValidationError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(now),
        Some(raw) => raw,
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTimestamp(raw.to_string()))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ValidationError::InvalidTimestamp(raw.to_string()))
}
