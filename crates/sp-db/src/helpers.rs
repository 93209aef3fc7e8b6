//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual datetime
//! format issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, Utc};
use sp_core::ledger::{checked_credits, checked_votes};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all sp-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read an INTEGER vote count, rejecting negative values.
///
/// # Errors
///
/// Returns `DatabaseError::Ledger` if the stored value is out of range.
pub fn get_votes(row: &libsql::Row, idx: i32, field: &'static str) -> Result<u32, DatabaseError> {
    Ok(checked_votes(field, row.get::<i64>(idx)?)?)
}

/// Read an INTEGER credit amount or counter, rejecting negative values.
///
/// # Errors
///
/// Returns `DatabaseError::Ledger` if the stored value is negative.
pub fn get_credits(
    row: &libsql::Row,
    idx: i32,
    field: &'static str,
) -> Result<u64, DatabaseError> {
    Ok(checked_credits(field, row.get::<i64>(idx)?)?)
}

/// Convert an unsigned amount to SQLite's signed INTEGER.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the value does not fit in `i64`.
pub fn to_sql_int(value: u64, field: &str) -> Result<i64, DatabaseError> {
    i64::try_from(value)
        .map_err(|_| DatabaseError::InvalidState(format!("{field} {value} exceeds INTEGER range")))
}

/// Decode the JSON array stored in a nullable TEXT tags column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a JSON string array.
pub fn parse_tags(s: Option<&str>) -> Result<Vec<String>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => serde_json::from_str(s)
            .map_err(|e| DatabaseError::Query(format!("Invalid tags JSON in column: {e}"))),
        _ => Ok(Vec::new()),
    }
}

/// Encode tags for storage. Empty lists are stored as NULL.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn encode_tags(tags: &[String]) -> Result<Option<String>, DatabaseError> {
    if tags.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(tags)
        .map(Some)
        .map_err(|e| DatabaseError::Other(e.into()))
}
