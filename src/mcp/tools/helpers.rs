//! Helper functions for MCP tools
//!
//! Argument parsing and validation shared by every toolset.

use crate::core::config::split_list;
use crate::core::services::Services;
use crate::mcp::error::McpError;
use chrono::{DateTime, NaiveDate};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Number, Value};

/// Deserialize tool arguments; missing arguments count as `{}`
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, McpError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))
}

/// Reject empty or whitespace-only required strings
pub fn require_non_empty(field: &str, value: &str) -> Result<(), McpError> {
    if value.trim().is_empty() {
        return Err(McpError::InvalidParams(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Treat an empty optional string as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Decode a JSON argument. Clients may pass either a JSON-encoded
/// string or the JSON value itself.
pub fn parse_json_arg<T: DeserializeOwned>(field: &str, value: Value) -> Result<T, McpError> {
    let parsed = match value {
        Value::String(raw) => serde_json::from_str(&raw),
        other => serde_json::from_value(other),
    };
    parsed.map_err(|e| McpError::InvalidParams(format!("invalid {field} JSON: {e}")))
}

/// Split a comma separated argument, trimming blanks
pub fn split_csv(value: &str) -> Vec<String> {
    split_list(value)
}

/// Comma separated argument that must name at least one entry
pub fn require_csv(field: &str, value: &str) -> Result<Vec<String>, McpError> {
    let items = split_csv(value);
    if items.is_empty() {
        return Err(McpError::InvalidParams(format!(
            "{field} must contain at least one value"
        )));
    }
    Ok(items)
}

/// Validate a `YYYY-MM-DD` date
pub fn validate_date(field: &str, value: &str) -> Result<(), McpError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        McpError::InvalidParams(format!("{field} must be a date in YYYY-MM-DD format"))
    })?;
    Ok(())
}

/// Validate an RFC 3339 timestamp
pub fn validate_timestamp(field: &str, value: &str) -> Result<(), McpError> {
    DateTime::parse_from_rfc3339(value).map_err(|_| {
        McpError::InvalidParams(format!("{field} must be an RFC 3339 timestamp"))
    })?;
    Ok(())
}

/// Check a value against a fixed set of choices
pub fn require_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), McpError> {
    if !allowed.contains(&value) {
        return Err(McpError::InvalidParams(format!(
            "{field} must be one of: {}",
            allowed.join(", ")
        )));
    }
    Ok(())
}

/// Deserialize a count or id sent as any JSON number with a whole,
/// non-negative value. Clients often send `42.0` for `42`.
pub fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    number_to_whole(Number::deserialize(deserializer)?)
}

/// `whole_number` for optional arguments; pair with `#[serde(default)]`
pub fn optional_whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    Option::<Number>::deserialize(deserializer)?
        .map(number_to_whole)
        .transpose()
}

fn number_to_whole<T, E>(number: Number) -> Result<T, E>
where
    T: TryFrom<u64>,
    E: de::Error,
{
    let whole = match number.as_u64() {
        Some(n) => n,
        None => match number.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => f as u64,
            _ => {
                return Err(E::custom(format!(
                    "expected a non-negative whole number, got {number}"
                )))
            }
        },
    };
    T::try_from(whole).map_err(|_| E::custom(format!("{whole} is out of range")))
}

/// Pick the index named by the call, falling back to the configured default
pub fn resolve_index(services: &Services, index_name: Option<String>) -> Result<String, McpError> {
    non_empty(index_name)
        .or_else(|| services.default_index().map(String::from))
        .ok_or_else(|| {
            McpError::InvalidParams(
                "indexName is required (no default index configured)".to_string(),
            )
        })
}
