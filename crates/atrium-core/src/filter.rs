//! Client list filtering.

use crate::entity::{Client, ClientStatus};

/// Search box plus status dropdown of the client list.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
  /// Case-insensitive substring matched against name and email.
  pub query:  String,
  /// `None` shows every status.
  pub status: Option<ClientStatus>,
}

impl ClientFilter {
  pub fn matches(&self, client: &Client) -> bool {
    let query = self.query.to_lowercase();
    let matches_search = client.name.to_lowercase().contains(&query)
      || client.email.to_lowercase().contains(&query);
    let matches_status = self.status.is_none_or(|s| s == client.status);
    matches_search && matches_status
  }

  pub fn apply<'a>(&self, clients: &'a [Client]) -> Vec<&'a Client> {
    clients.iter().filter(|c| self.matches(c)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::role::Role;

  fn client(id: &str, name: &str, email: &str, status: ClientStatus) -> Client {
    Client {
      id:          id.into(),
      name:        name.into(),
      email:       email.into(),
      phone:       String::new(),
      status,
      permissions: Role::Client,
      joined_date: "2024-01-15".parse().unwrap(),
      group_id:    None,
    }
  }

  fn sample() -> Vec<Client> {
    vec![
      client("1", "Acme Corp", "contact@acme.com", ClientStatus::Active),
      client("2", "Widget Inc", "info@widget.com", ClientStatus::Active),
      client("3", "XYZ Industries", "hello@xyz.com", ClientStatus::Inactive),
    ]
  }

  #[test]
  fn empty_filter_matches_everything() {
    assert_eq!(ClientFilter::default().apply(&sample()).len(), 3);
  }

  #[test]
  fn query_matches_name_or_email_ignoring_case() {
    let clients = sample();
    let by_name = ClientFilter { query: "acme".into(), status: None };
    assert_eq!(by_name.apply(&clients)[0].id, "1");
    let by_email = ClientFilter { query: "WIDGET.COM".into(), status: None };
    assert_eq!(by_email.apply(&clients)[0].id, "2");
  }

  #[test]
  fn status_narrows_results() {
    let filter = ClientFilter {
      query:  String::new(),
      status: Some(ClientStatus::Inactive),
    };
    let clients = sample();
    let hits = filter.apply(&clients);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "3");
  }
}
