//! Initial contents of the local collections.

use atrium_core::entity::{
  Document, Event, Importance, Notification, NotificationKind, PersonalNote,
};
use chrono::NaiveDate;

pub(crate) const DEFAULT_NICKNAME: &str = "Admin User";

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub(crate) fn documents() -> Vec<Document> {
  vec![
    Document {
      id:              "1".into(),
      name:            "Annual Report".into(),
      deadline:        ymd(2025, 6, 30),
      importance:      Importance::High,
      created_at:      ymd(2025, 5, 1),
      additional_info: Some("Contains financial projections for the next fiscal year.".into()),
    },
    Document {
      id:              "2".into(),
      name:            "Marketing Plan".into(),
      deadline:        ymd(2025, 6, 15),
      importance:      Importance::Medium,
      created_at:      ymd(2025, 5, 5),
      additional_info: Some("Focus on digital marketing strategies.".into()),
    },
    Document {
      id:              "3".into(),
      name:            "Budget Review".into(),
      deadline:        ymd(2025, 5, 25),
      importance:      Importance::High,
      created_at:      ymd(2025, 5, 10),
      additional_info: None,
    },
  ]
}

pub(crate) fn events() -> Vec<Event> {
  vec![
    Event {
      id:              "1".into(),
      title:           "Product Launch".into(),
      date:            ymd(2025, 6, 15),
      description:     "Launching our new product line".into(),
      sent_to_clients: false,
      redacted:        false,
    },
    Event {
      id:              "2".into(),
      title:           "Quarterly Meeting".into(),
      date:            ymd(2025, 5, 30),
      description:     "Review Q2 performance".into(),
      sent_to_clients: true,
      redacted:        false,
    },
    Event {
      id:              "3".into(),
      title:           "Team Building".into(),
      date:            ymd(2025, 7, 10),
      description:     "Annual team building event".into(),
      sent_to_clients: false,
      redacted:        false,
    },
  ]
}

/// Oldest first; the log only ever grows at the end.
pub(crate) fn notifications() -> Vec<Notification> {
  vec![
    Notification {
      id:       "2".into(),
      title:    "Important Updates".into(),
      message:  "Dear valued clients,\n\n\
                 We have some important updates regarding our service hours during the upcoming holiday season.\n\n\
                 Please check our website for details.\n\n\
                 Best regards,\nAdmin Team"
        .into(),
      sent_at:  ymd(2025, 5, 10),
      kind:     NotificationKind::Custom,
      event_id: None,
    },
    Notification {
      id:       "1".into(),
      title:    "Product Launch".into(),
      message:  "Dear Client,\n\n\
                 We would like to inform you about our upcoming event: \"Product Launch\" scheduled for June 15, 2025.\n\n\
                 Launching our new product line\n\n\
                 Please let us know if you'll be able to attend.\n\n\
                 Best regards,\nAdmin Team"
        .into(),
      sent_at:  ymd(2025, 5, 15),
      kind:     NotificationKind::Event,
      event_id: Some("1".into()),
    },
  ]
}

pub(crate) fn personal_notes() -> Vec<PersonalNote> {
  vec![
    PersonalNote {
      id:          "1".into(),
      title:       "Project Ideas".into(),
      date:        Some(ymd(2025, 6, 1)),
      description: "Brainstorm new project ideas for Q3".into(),
      created_at:  ymd(2025, 5, 15),
    },
    PersonalNote {
      id:          "2".into(),
      title:       "Client Meeting Notes".into(),
      date:        Some(ymd(2025, 5, 25)),
      description: "Notes from the meeting with Acme Corp. Discussed new requirements.".into(),
      created_at:  ymd(2025, 5, 10),
    },
  ]
}
