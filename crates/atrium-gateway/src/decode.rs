//! Tolerant decoding of server records.
//!
//! The server is inconsistent about field names and types (numeric or string
//! ids, several spellings of the join date). Everything that reads its user
//! and group payloads goes through here.
//!
//! Join date priority, first parseable value wins:
//!
//! 1. `join_date` (date or datetime, reduced to its UTC date)
//! 2. `joinedDate`
//! 3. `created_at`
//! 4. `createdAt`
//! 5. today
//!
//! `privilege_level` must be a JSON number; any other type decodes to a
//! plain client.

use atrium_core::{
  Role,
  entity::{Client, ClientStatus, Group},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const JOIN_DATE_FIELDS: [&str; 4] = ["join_date", "joinedDate", "created_at", "createdAt"];
const GROUP_DATE_FIELDS: [&str; 2] = ["created_at", "createdAt"];

/// Decode one `GET /my/users` record into a [`Client`].
pub fn decode_user(record: &Value, today: NaiveDate) -> Client {
  Client {
    id:          id_string(record.get("id")).unwrap_or_default(),
    name:        string_field(record, "name"),
    email:       string_field(record, "email"),
    phone:       string_field(record, "phone"),
    status:      record
      .get("status")
      .and_then(Value::as_str)
      .and_then(|s| s.parse().ok())
      .unwrap_or(ClientStatus::Active),
    permissions: record
      .get("privilege_level")
      .and_then(Value::as_i64)
      .map(Role::from_privilege_level)
      .unwrap_or(Role::Client),
    joined_date: first_date(record, &JOIN_DATE_FIELDS).unwrap_or(today),
    group_id:    group_ref(record.get("group_id")),
  }
}

/// Decode the `GET /my/users` array.
pub fn decode_users(body: &Value, today: NaiveDate) -> Result<Vec<Client>, String> {
  let records = body
    .as_array()
    .ok_or_else(|| format!("expected an array of users, got {}", kind(body)))?;
  Ok(records.iter().map(|r| decode_user(r, today)).collect())
}

/// Decode one group record.
pub fn decode_group(record: &Value, today: NaiveDate) -> Result<Group, String> {
  let id = id_string(record.get("id")).ok_or("group record has no id")?;
  Ok(Group {
    id,
    name: string_field(record, "name"),
    created_at: first_date(record, &GROUP_DATE_FIELDS).unwrap_or(today),
  })
}

pub fn decode_groups(body: &Value, today: NaiveDate) -> Result<Vec<Group>, String> {
  body
    .as_array()
    .ok_or_else(|| format!("expected an array of groups, got {}", kind(body)))?
    .iter()
    .map(|r| decode_group(r, today))
    .collect()
}

/// Parse a date or datetime string into a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (converted to UTC first) and
/// naive `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    return Some(date);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc).date_naive());
  }
  ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    .map(|dt| dt.date())
}

// ─── Field helpers ───────────────────────────────────────────────────────────

fn string_field(record: &Value, key: &str) -> String {
  record
    .get(key)
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_string()
}

fn id_string(value: Option<&Value>) -> Option<String> {
  match value? {
    Value::Number(n) => Some(n.to_string()),
    Value::String(s) if !s.is_empty() => Some(s.clone()),
    _ => None,
  }
}

/// A falsy group reference (missing, null, `0`, `""`) means "no group".
fn group_ref(value: Option<&Value>) -> Option<String> {
  match value? {
    Value::Number(n) if n.as_i64() == Some(0) => None,
    other => id_string(Some(other)),
  }
}

fn first_date(record: &Value, fields: &[&str]) -> Option<NaiveDate> {
  fields
    .iter()
    .filter_map(|f| record.get(*f).and_then(Value::as_str))
    .find_map(parse_date)
}

fn kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
