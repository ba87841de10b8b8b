//! Typed access to [`Row`] columns

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::errors::StoreError;
use crate::executor::Row;

pub(crate) fn required_string(row: &Row, column: &str) -> Result<String, StoreError> {
    optional_string(row, column)
        .ok_or_else(|| StoreError::SerializationError(format!("column {} is missing or null", column)))
}

pub(crate) fn optional_string(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn required_i64(row: &Row, column: &str) -> Result<i64, StoreError> {
    optional_i64(row, column)?
        .ok_or_else(|| StoreError::SerializationError(format!("column {} is missing or null", column)))
}

pub(crate) fn optional_i64(row: &Row, column: &str) -> Result<Option<i64>, StoreError> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| {
            StoreError::SerializationError(format!("column {} is not an integer: {}", column, n))
        }),
        Some(Value::String(s)) => s.parse().map(Some).map_err(|_| {
            StoreError::SerializationError(format!("column {} is not an integer: {}", column, s))
        }),
        Some(other) => Err(StoreError::SerializationError(format!(
            "column {} is not an integer: {}",
            column, other
        ))),
    }
}

pub(crate) fn optional_timestamp(row: &Row, column: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
    optional_string(row, column)
        .map(|text| parse_timestamp(&text))
        .transpose()
}

/// Timestamps are stored as RFC 3339 text with millisecond precision, so
/// they sort chronologically as strings on every backend
pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(text)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| StoreError::SerializationError(format!("invalid timestamp '{}': {}", text, e)))
}
