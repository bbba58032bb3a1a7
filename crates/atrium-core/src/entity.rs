//! Domain entities shown on the dashboard, plus their input and patch types.
//!
//! Documents, events, notifications and personal notes only ever exist in the
//! local store. Clients and groups are mirrors of server records. All of them
//! serialise with the camelCase field names the view layer reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::role::Role;

// ─── Enums ───────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Importance {
  High,
  #[default]
  Medium,
  Low,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ClientStatus {
  #[default]
  Active,
  Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
  /// Sent about a specific [`Event`]; `event_id` is set.
  Event,
  /// Free-form broadcast.
  Custom,
}

// ─── Local entities ──────────────────────────────────────────────────────────

/// A document with a deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
  pub id:              String,
  pub name:            String,
  pub deadline:        NaiveDate,
  pub importance:      Importance,
  pub created_at:      NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub additional_info: Option<String>,
}

/// Input to `add_document`. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
  pub name:            String,
  pub deadline:        NaiveDate,
  #[serde(default)]
  pub importance:      Importance,
  #[serde(default)]
  pub additional_info: Option<String>,
}

/// Partial update for a [`Document`]. `None` leaves a field untouched;
/// `additional_info: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
  pub name:            Option<String>,
  pub deadline:        Option<NaiveDate>,
  pub importance:      Option<Importance>,
  pub additional_info: Option<Option<String>>,
}

impl DocumentPatch {
  pub fn apply(self, doc: &mut Document) {
    if let Some(name) = self.name {
      doc.name = name;
    }
    if let Some(deadline) = self.deadline {
      doc.deadline = deadline;
    }
    if let Some(importance) = self.importance {
      doc.importance = importance;
    }
    if let Some(info) = self.additional_info {
      doc.additional_info = info;
    }
  }
}

/// A scheduled event that can be announced to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
  pub id:              String,
  pub title:           String,
  pub date:            NaiveDate,
  pub description:     String,
  /// Set once the event has been announced; never reset.
  pub sent_to_clients: bool,
  /// Hides description and send status in the views.
  pub redacted:        bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
  pub title:       String,
  pub date:        NaiveDate,
  #[serde(default)]
  pub description: String,
}

/// Partial update for an [`Event`].
///
/// Has no `sent_to_clients` or `redacted` field: those change
/// only through `send_event_to_clients` and `toggle_event_redaction`.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
  pub title:       Option<String>,
  pub date:        Option<NaiveDate>,
  pub description: Option<String>,
}

impl EventPatch {
  pub fn apply(self, event: &mut Event) {
    if let Some(title) = self.title {
      event.title = title;
    }
    if let Some(date) = self.date {
      event.date = date;
    }
    if let Some(description) = self.description {
      event.description = description;
    }
  }
}

/// An entry in the append-only log of messages sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
  pub id:       String,
  pub title:    String,
  pub message:  String,
  pub sent_at:  NaiveDate,
  #[serde(rename = "type")]
  pub kind:     NotificationKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub event_id: Option<String>,
}

/// A private note for the signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalNote {
  pub id:          String,
  pub title:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date:        Option<NaiveDate>,
  pub description: String,
  pub created_at:  NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPersonalNote {
  pub title:       String,
  #[serde(default)]
  pub date:        Option<NaiveDate>,
  #[serde(default)]
  pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct PersonalNotePatch {
  pub title:       Option<String>,
  pub date:        Option<Option<NaiveDate>>,
  pub description: Option<String>,
}

impl PersonalNotePatch {
  pub fn apply(self, note: &mut PersonalNote) {
    if let Some(title) = self.title {
      note.title = title;
    }
    if let Some(date) = self.date {
      note.date = date;
    }
    if let Some(description) = self.description {
      note.description = description;
    }
  }
}

// ─── Remote entities ─────────────────────────────────────────────────────────

/// A client account, mirrored from the server's user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
  pub id:          String,
  pub name:        String,
  pub email:       String,
  pub phone:       String,
  pub status:      ClientStatus,
  pub permissions: Role,
  pub joined_date: NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub group_id:    Option<String>,
}

impl Client {
  pub fn is_active(&self) -> bool { self.status == ClientStatus::Active }
}

/// A named set of clients, owned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
  pub id:         String,
  pub name:       String,
  pub created_at: NaiveDate,
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// The signed-in administrator, as resolved from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub username: String,
  pub name:     String,
  pub role:     Role,
}
