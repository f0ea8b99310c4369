//! Raw record normalization.
//!
//! Input records are JSON objects whose keys are chosen by the data source; a [`ColumnMapping`]
//! says which key holds which field. Normalization is a pure pass over the input that either
//! yields one [`WeatherRecord`] per input record (same order) or fails on the first bad record.

use crate::registry::ConditionRegistry;
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Condition prefixes whose sub-variants ("Rain, Overcast", "Snow showers", ...) collapse into a
/// single category.
pub const COLLAPSED_CONDITION_PREFIXES: [&str; 2] = ["Rain", "Snow"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub date: String,
    pub high: String,
    pub low: String,
    pub condition: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            high: "high".to_string(),
            low: "low".to_string(),
            condition: "condition".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    /// The date exactly as it appeared in the input; used as the date node id.
    pub date: String,
    pub calendar_date: NaiveDate,
    /// Day of month, the label drawn under each date node.
    pub day: u32,
    pub high: f64,
    pub low: f64,
    pub condition_raw: String,
    pub condition: String,
    pub color: String,
}

/// Collapses a free-text condition into its canonical category id.
pub fn canonical_condition(raw: &str) -> &str {
    COLLAPSED_CONDITION_PREFIXES
        .iter()
        .find(|prefix| raw.starts_with(*prefix))
        .copied()
        .unwrap_or(raw)
}

pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return Some(d);
    }
    // ISO date-time (`2020-01-01T00:00:00`, `2020-01-01 08:00`): keep the calendar part.
    if let Some(head) = t.get(..10) {
        let sep = t[10..].chars().next();
        if matches!(sep, Some('T') | Some(' ')) {
            if let Ok(d) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
                return Some(d);
            }
        }
    }
    NaiveDate::parse_from_str(t, "%m/%d/%Y").ok()
}

fn field<'a>(record: &'a Value, index: usize, key: &str) -> Result<&'a Value> {
    match record.get(key) {
        Some(Value::Null) | None => Err(Error::MissingField {
            index,
            field: key.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

fn number_field(record: &Value, index: usize, key: &str) -> Result<f64> {
    let invalid = |message: String| Error::InvalidField {
        index,
        field: key.to_string(),
        message,
    };
    let v = match field(record, index, key)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid(format!("number {n} is not representable")))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("expected a number, got {s:?}")))?,
        other => return Err(invalid(format!("expected a number, got {other}"))),
    };
    if !v.is_finite() {
        return Err(invalid(format!("expected a finite number, got {v}")));
    }
    Ok(v)
}

fn string_field<'a>(record: &'a Value, index: usize, key: &str) -> Result<&'a str> {
    match field(record, index, key)? {
        Value::String(s) => Ok(s.as_str()),
        other => Err(Error::InvalidField {
            index,
            field: key.to_string(),
            message: format!("expected a string, got {other}"),
        }),
    }
}

pub fn normalize_record(
    record: &Value,
    index: usize,
    columns: &ColumnMapping,
    registry: &ConditionRegistry,
) -> Result<WeatherRecord> {
    let date = string_field(record, index, &columns.date)?;
    let calendar_date = parse_calendar_date(date).ok_or_else(|| Error::InvalidDate {
        index,
        value: date.to_string(),
    })?;
    let high = number_field(record, index, &columns.high)?;
    let low = number_field(record, index, &columns.low)?;
    let condition_raw = string_field(record, index, &columns.condition)?;

    let condition = canonical_condition(condition_raw);
    let category = registry
        .get(condition)
        .ok_or_else(|| Error::UnknownCondition {
            condition: condition.to_string(),
            raw: condition_raw.to_string(),
        })?;

    Ok(WeatherRecord {
        date: date.to_string(),
        calendar_date,
        day: calendar_date.day(),
        high,
        low,
        condition_raw: condition_raw.to_string(),
        condition: category.id.clone(),
        color: category.color.clone(),
    })
}

/// Normalizes `records` in input order. Dates must be distinct.
pub fn normalize_records(
    records: &[Value],
    columns: &ColumnMapping,
    registry: &ConditionRegistry,
) -> Result<Vec<WeatherRecord>> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut out = Vec::with_capacity(records.len());
    for (index, raw) in records.iter().enumerate() {
        let record = normalize_record(raw, index, columns, registry)?;
        if !seen.insert(record.date.clone()) {
            return Err(Error::DuplicateDate { date: record.date });
        }
        out.push(record);
    }
    tracing::debug!(records = out.len(), "normalized weather records");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_rain_and_snow_variants() {
        assert_eq!(canonical_condition("Rain, Partially cloudy"), "Rain");
        assert_eq!(canonical_condition("Snowstorm"), "Snow");
        assert_eq!(canonical_condition("Overcast"), "Overcast");
        // Prefix match is case sensitive, like the source data.
        assert_eq!(canonical_condition("rain"), "rain");
    }

    #[test]
    fn parses_common_date_shapes() {
        let jan1 = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert_eq!(parse_calendar_date("2020-01-01"), jan1);
        assert_eq!(parse_calendar_date("2020-01-01T12:30:00"), jan1);
        assert_eq!(parse_calendar_date("01/01/2020"), jan1);
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("2020-01-01é"), None);
    }
}
