//! Default message bodies offered when notifying clients.

use crate::entity::Event;

/// The letter pre-filled when announcing `event` to clients.
pub fn event_invitation(event: &Event) -> String {
  format!(
    "Dear Client,\n\n\
     We would like to inform you about our upcoming event: \"{title}\" scheduled for {date}.\n\n\
     {description}\n\n\
     Please let us know if you'll be able to attend.\n\n\
     Best regards,\nAdmin Team",
    title = event.title,
    date = event.date.format("%B %d, %Y"),
    description = event.description,
  )
}
