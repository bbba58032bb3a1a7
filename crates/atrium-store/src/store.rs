//! [`DataStore`]: the single owner of everything the dashboard shows.

use atrium_core::{
  EntityKind, Error, RemoteRequestError, Result, Role,
  clock::{Clock, SystemClock},
  entity::{
    Client, ClientStatus, Document, DocumentPatch, Event, EventPatch, Group, Identity,
    NewDocument, NewEvent, NewPersonalNote, Notification, NotificationKind, PersonalNote,
    PersonalNotePatch,
  },
  gateway::RemoteGateway,
};
use uuid::Uuid;

use crate::{
  notice::{Notice, NoticeLevel},
  seed,
  sync::{SyncOutcome, SyncTicket},
};

fn new_id() -> String { Uuid::new_v4().to_string() }

fn position_of<T>(items: &[T], id: &str, key: impl Fn(&T) -> &str) -> Option<usize> {
  items.iter().position(|item| key(item) == id)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// In-memory application state.
///
/// Documents, events, notifications and personal notes are local and start
/// from seed data. Clients and groups mirror the server: they start empty, are
/// replaced wholesale by [`DataStore::on_identity_changed`], and are only
/// modified after the gateway confirms a change.
///
/// Local operations on an unknown id return [`Error::NotFound`] and change
/// nothing. Gateway-backed operations never return an error: a failure is
/// logged, queued as an error [`Notice`], and reported as `false`/`None`.
pub struct DataStore<G> {
  gateway:        G,
  clock:          Box<dyn Clock>,

  documents:      Vec<Document>,
  events:         Vec<Event>,
  notifications:  Vec<Notification>,
  personal_notes: Vec<PersonalNote>,
  nickname:       String,

  clients:        Vec<Client>,
  groups:         Vec<Group>,

  notices:        Vec<Notice>,
  generation:     u64,
  synced_for:     Option<Identity>,
}

impl<G: RemoteGateway> DataStore<G> {
  pub fn new(gateway: G) -> Self { Self::with_clock(gateway, SystemClock) }

  pub fn with_clock(gateway: G, clock: impl Clock + 'static) -> Self {
    Self {
      gateway,
      clock: Box::new(clock),
      documents: seed::documents(),
      events: seed::events(),
      notifications: seed::notifications(),
      personal_notes: seed::personal_notes(),
      nickname: seed::DEFAULT_NICKNAME.to_string(),
      clients: Vec::new(),
      groups: Vec::new(),
      notices: Vec::new(),
      generation: 0,
      synced_for: None,
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Newest first.
  pub fn documents(&self) -> &[Document] { &self.documents }

  /// Newest first.
  pub fn events(&self) -> &[Event] { &self.events }

  /// Oldest first; append-only.
  pub fn notifications(&self) -> &[Notification] { &self.notifications }

  pub fn personal_notes(&self) -> &[PersonalNote] { &self.personal_notes }

  pub fn clients(&self) -> &[Client] { &self.clients }

  pub fn groups(&self) -> &[Group] { &self.groups }

  pub fn nickname(&self) -> &str { &self.nickname }

  /// The identity the remote mirrors currently belong to.
  pub fn synced_identity(&self) -> Option<&Identity> { self.synced_for.as_ref() }

  pub fn document(&self, id: &str) -> Option<&Document> {
    self.documents.iter().find(|d| d.id == id)
  }

  pub fn event(&self, id: &str) -> Option<&Event> { self.events.iter().find(|e| e.id == id) }

  pub fn personal_note(&self, id: &str) -> Option<&PersonalNote> {
    self.personal_notes.iter().find(|n| n.id == id)
  }

  pub fn client(&self, id: &str) -> Option<&Client> { self.clients.iter().find(|c| c.id == id) }

  pub fn group(&self, id: &str) -> Option<&Group> { self.groups.iter().find(|g| g.id == id) }

  pub fn active_client_count(&self) -> usize {
    self.clients.iter().filter(|c| c.is_active()).count()
  }

  pub fn clients_in_group(&self, group_id: &str) -> Vec<&Client> {
    self
      .clients
      .iter()
      .filter(|c| c.group_id.as_deref() == Some(group_id))
      .collect()
  }

  /// Drain the queued notices, oldest first.
  pub fn take_notices(&mut self) -> Vec<Notice> { std::mem::take(&mut self.notices) }

  fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
    self.notices.push(Notice {
      level,
      message: message.into(),
    });
  }

  fn fail(&mut self, what: &str, error: &RemoteRequestError) {
    tracing::warn!(%error, "{what}");
    self.notify(NoticeLevel::Error, format!("{what}: {error}"));
  }

  // ── Documents ─────────────────────────────────────────────────────────

  pub fn add_document(&mut self, input: NewDocument) -> &Document {
    let doc = Document {
      id:              new_id(),
      name:            input.name,
      deadline:        input.deadline,
      importance:      input.importance,
      created_at:      self.clock.today(),
      additional_info: input.additional_info,
    };
    self.documents.insert(0, doc);
    self.notify(NoticeLevel::Success, "Document added successfully");
    &self.documents[0]
  }

  pub fn update_document(&mut self, id: &str, patch: DocumentPatch) -> Result<&Document> {
    let idx = position_of(&self.documents, id, |d| d.id.as_str())
      .ok_or_else(|| Error::not_found(EntityKind::Document, id))?;
    patch.apply(&mut self.documents[idx]);
    self.notify(NoticeLevel::Success, "Document updated successfully");
    Ok(&self.documents[idx])
  }

  pub fn delete_document(&mut self, id: &str) -> Result<Document> {
    let idx = position_of(&self.documents, id, |d| d.id.as_str())
      .ok_or_else(|| Error::not_found(EntityKind::Document, id))?;
    let removed = self.documents.remove(idx);
    self.notify(NoticeLevel::Success, "Document deleted successfully");
    Ok(removed)
  }

  // ── Events ────────────────────────────────────────────────────────────

  pub fn add_event(&mut self, input: NewEvent) -> &Event {
    let event = Event {
      id:              new_id(),
      title:           input.title,
      date:            input.date,
      description:     input.description,
      sent_to_clients: false,
      redacted:        false,
    };
    self.events.insert(0, event);
    self.notify(NoticeLevel::Success, "Event added successfully");
    &self.events[0]
  }

  /// Edit title, date or description. The send flag and redaction are not
  /// reachable from here.
  pub fn update_event(&mut self, id: &str, patch: EventPatch) -> Result<&Event> {
    let idx = position_of(&self.events, id, |e| e.id.as_str())
      .ok_or_else(|| Error::not_found(EntityKind::Event, id))?;
    patch.apply(&mut self.events[idx]);
    self.notify(NoticeLevel::Success, "Event updated successfully");
    Ok(&self.events[idx])
  }

  /// Notifications already sent about the event stay in the log.
  pub fn delete_event(&mut self, id: &str) -> Result<Event> {
    let idx = position_of(&self.events, id, |e| e.id.as_str())
      .ok_or_else(|| Error::not_found(EntityKind::Event, id))?;
    let removed = self.events.remove(idx);
    self.notify(NoticeLevel::Success, "Event deleted successfully");
    Ok(removed)
  }

  /// Flip `redacted` and return the new value.
  pub fn toggle_event_redaction(&mut self, id: &str) -> Result<bool> {
    let event = self
      .events
      .iter_mut()
      .find(|e| e.id == id)
      .ok_or_else(|| Error::not_found(EntityKind::Event, id))?;
    event.redacted = !event.redacted;
    let redacted = event.redacted;
    let message = if redacted { "Event redacted" } else { "Event unredacted" };
    self.notify(NoticeLevel::Info, message);
    Ok(redacted)
  }

  // ── Notifications ─────────────────────────────────────────────────────

  /// Mark the event as sent and log an `event` notification carrying
  /// `message`. Delivery itself is outside the store.
  pub fn send_event_to_clients(&mut self, event_id: &str, message: &str) -> Result<&Notification> {
    let sent_at = self.clock.today();
    let recipients = self.active_client_count();
    let event = self
      .events
      .iter_mut()
      .find(|e| e.id == event_id)
      .ok_or_else(|| Error::not_found(EntityKind::Event, event_id))?;
    event.sent_to_clients = true;

    let notification = Notification {
      id: new_id(),
      title: event.title.clone(),
      message: message.to_string(),
      sent_at,
      kind: NotificationKind::Event,
      event_id: Some(event.id.clone()),
    };
    tracing::info!(event_id, recipients, "event sent to clients");
    self.notifications.push(notification);
    self.notify(
      NoticeLevel::Success,
      format!("Event notification sent to {recipients} active clients"),
    );
    Ok(&self.notifications[self.notifications.len() - 1])
  }

  pub fn send_custom_notification(&mut self, title: &str, message: &str) -> &Notification {
    let recipients = self.active_client_count();
    let notification = Notification {
      id:       new_id(),
      title:    title.to_string(),
      message:  message.to_string(),
      sent_at:  self.clock.today(),
      kind:     NotificationKind::Custom,
      event_id: None,
    };
    tracing::info!(title, recipients, "custom notification sent");
    self.notifications.push(notification);
    self.notify(
      NoticeLevel::Success,
      format!("Notification sent to {recipients} active clients"),
    );
    &self.notifications[self.notifications.len() - 1]
  }

  // ── Personal notes & profile ──────────────────────────────────────────

  pub fn add_personal_note(&mut self, input: NewPersonalNote) -> &PersonalNote {
    let note = PersonalNote {
      id:          new_id(),
      title:       input.title,
      date:        input.date,
      description: input.description,
      created_at:  self.clock.today(),
    };
    self.personal_notes.insert(0, note);
    self.notify(NoticeLevel::Success, "Note added successfully");
    &self.personal_notes[0]
  }

  pub fn update_personal_note(&mut self, id: &str, patch: PersonalNotePatch) -> Result<&PersonalNote> {
    let idx = position_of(&self.personal_notes, id, |n| n.id.as_str())
      .ok_or_else(|| Error::not_found(EntityKind::PersonalNote, id))?;
    patch.apply(&mut self.personal_notes[idx]);
    self.notify(NoticeLevel::Success, "Note updated successfully");
    Ok(&self.personal_notes[idx])
  }

  pub fn delete_personal_note(&mut self, id: &str) -> Result<PersonalNote> {
    let idx = position_of(&self.personal_notes, id, |n| n.id.as_str())
      .ok_or_else(|| Error::not_found(EntityKind::PersonalNote, id))?;
    let removed = self.personal_notes.remove(idx);
    self.notify(NoticeLevel::Success, "Note deleted successfully");
    Ok(removed)
  }

  /// Change the display name. Not sent anywhere.
  pub fn update_nickname(&mut self, nickname: &str) {
    self.nickname = nickname.trim().to_string();
    self.notify(NoticeLevel::Success, "Nickname updated");
  }

  // ── Clients (local) ───────────────────────────────────────────────────

  /// Mirror-only change; the server has no status endpoint, so the next
  /// refresh restores the server's value.
  pub fn update_client_status(&mut self, client_id: &str, status: ClientStatus) -> Result<&Client> {
    let idx = position_of(&self.clients, client_id, |c| c.id.as_str())
      .ok_or_else(|| Error::not_found(EntityKind::Client, client_id))?;
    self.clients[idx].status = status;
    self.notify(NoticeLevel::Success, format!("Client status updated to {status}"));
    Ok(&self.clients[idx])
  }

  // ── Clients (remote) ──────────────────────────────────────────────────

  /// Move a client into `group_id`, or out of any group with `None`.
  ///
  /// Refused without a request when the client or group is not in the
  /// mirror. On success the client's group comes from the server's reply.
  pub async fn update_client_group(&mut self, client_id: &str, group_id: Option<&str>) -> bool {
    if self.client(client_id).is_none() {
      self.notify(NoticeLevel::Error, format!("Unknown client {client_id}"));
      return false;
    }
    if let Some(g) = group_id
      && self.group(g).is_none()
    {
      self.notify(NoticeLevel::Error, format!("Unknown group {g}"));
      return false;
    }

    match self.gateway.assign_client_group(client_id, group_id).await {
      Ok(updated) => {
        if let Some(client) = self.clients.iter_mut().find(|c| c.id == client_id) {
          client.group_id = updated.group_id;
        }
        tracing::info!(client_id, group_id, "client group updated");
        self.notify(NoticeLevel::Success, "Client group updated");
        true
      }
      Err(e) => {
        self.fail("Could not update client group", &e);
        false
      }
    }
  }

  /// Assign a permission level through the server, then mirror it.
  ///
  /// Callers are expected to check [`Role::can_manage_permissions`] for the
  /// signed-in identity first; the store does not.
  pub async fn update_client_permissions(&mut self, client_id: &str, role: Role) -> bool {
    if self.client(client_id).is_none() {
      self.notify(NoticeLevel::Error, format!("Unknown client {client_id}"));
      return false;
    }

    match self.gateway.assign_client_permission(client_id, role).await {
      Ok(()) => {
        if let Some(client) = self.clients.iter_mut().find(|c| c.id == client_id) {
          client.permissions = role;
        }
        tracing::info!(client_id, %role, "client permissions updated");
        self.notify(NoticeLevel::Success, format!("Client permissions updated to {role}"));
        true
      }
      Err(e) => {
        self.fail("Could not update client permissions", &e);
        false
      }
    }
  }

  // ── Groups ────────────────────────────────────────────────────────────

  pub async fn add_group(&mut self, name: &str) -> Option<Group> {
    match self.gateway.add_group(name).await {
      Ok(group) => {
        self.groups.push(group.clone());
        self.notify(NoticeLevel::Success, format!("Group \"{}\" created", group.name));
        Some(group)
      }
      Err(e) => {
        self.fail("Could not create group", &e);
        None
      }
    }
  }

  pub async fn update_group(&mut self, id: &str, name: &str) -> Option<Group> {
    match self.gateway.update_group(id, name).await {
      Ok(group) => {
        match self.groups.iter_mut().find(|g| g.id == group.id) {
          Some(existing) => *existing = group.clone(),
          None => self.groups.push(group.clone()),
        }
        self.notify(NoticeLevel::Success, format!("Group renamed to \"{}\"", group.name));
        Some(group)
      }
      Err(e) => {
        self.fail("Could not update group", &e);
        None
      }
    }
  }

  /// Delete on the server, then drop the group and clear it from every
  /// client that referenced it.
  pub async fn delete_group(&mut self, id: &str) -> bool {
    match self.gateway.delete_group(id).await {
      Ok(()) => {
        self.groups.retain(|g| g.id != id);
        let mut released = 0;
        for client in self.clients.iter_mut().filter(|c| c.group_id.as_deref() == Some(id)) {
          client.group_id = None;
          released += 1;
        }
        tracing::info!(group_id = id, released, "group deleted");
        self.notify(NoticeLevel::Success, "Group deleted");
        true
      }
      Err(e) => {
        self.fail("Could not delete group", &e);
        false
      }
    }
  }

  /// Replace the group mirror with the server's current set.
  ///
  /// A refresh for the identity the mirrors already belong to: it takes no
  /// ticket, so a pending identity sync stays current.
  pub async fn refresh_groups(&mut self) -> bool {
    match self.gateway.fetch_groups().await {
      Ok(groups) => {
        self.groups = groups;
        true
      }
      Err(e) => {
        self.fail("Could not fetch groups", &e);
        false
      }
    }
  }

  // ── Reconciliation ────────────────────────────────────────────────────

  /// Re-sync the remote mirrors for a new session identity.
  ///
  /// With an identity, fetches clients and groups once each and replaces
  /// both mirrors. Without one, empties them without touching the network.
  pub async fn on_identity_changed(&mut self, identity: Option<&Identity>) -> SyncOutcome {
    let ticket = self.begin_sync(identity.cloned());
    if ticket.identity.is_none() {
      return self.apply_sync(&ticket, Ok(Vec::new()), Ok(Vec::new()));
    }
    let clients = self.gateway.fetch_clients().await;
    let groups = self.gateway.fetch_groups().await;
    self.apply_sync(&ticket, clients, groups)
  }

  /// Start a refresh for `identity`. Any ticket issued earlier becomes stale.
  pub fn begin_sync(&mut self, identity: Option<Identity>) -> SyncTicket {
    self.generation += 1;
    SyncTicket {
      generation: self.generation,
      identity,
    }
  }

  /// Apply fetched collections if `ticket` is still the latest refresh.
  ///
  /// A failed fetch queues an error notice. When the ticket is for the
  /// identity the mirrors already belong to, that mirror is left as it was;
  /// after an identity switch it is emptied instead.
  pub fn apply_sync(
    &mut self,
    ticket: &SyncTicket,
    clients: Result<Vec<Client>, RemoteRequestError>,
    groups: Result<Vec<Group>, RemoteRequestError>,
  ) -> SyncOutcome {
    if ticket.generation != self.generation {
      tracing::debug!(
        ticket = ticket.generation,
        current = self.generation,
        "discarding stale sync"
      );
      return SyncOutcome::Stale;
    }

    let same_identity = self.synced_for == ticket.identity;
    let mut outcome = SyncOutcome::Applied;
    match clients {
      Ok(clients) => self.clients = clients,
      Err(e) => {
        self.fail("Could not fetch clients", &e);
        if !same_identity {
          self.clients.clear();
        }
        outcome = SyncOutcome::Incomplete;
      }
    }
    match groups {
      Ok(groups) => self.groups = groups,
      Err(e) => {
        self.fail("Could not fetch groups", &e);
        if !same_identity {
          self.groups.clear();
        }
        outcome = SyncOutcome::Incomplete;
      }
    }
    self.synced_for = ticket.identity.clone();

    tracing::info!(
      generation = ticket.generation,
      clients = self.clients.len(),
      groups = self.groups.len(),
      ?outcome,
      "remote mirrors synced"
    );
    outcome
  }
}
