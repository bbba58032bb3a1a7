//! The `RemoteGateway` trait.
//!
//! Implemented over HTTP by `atrium-gateway`. The store depends on this
//! abstraction so it can be driven by a stub in tests.

use std::future::Future;

use crate::{
  entity::{Client, Group},
  error::RemoteRequestError,
  role::Role,
};

/// Authenticated CRUD against the server-owned collections.
///
/// Every call is a single attempt. A missing bearer token fails with
/// [`RemoteRequestError::NotAuthenticated`] before anything is sent.
pub trait RemoteGateway: Send + Sync {
  // ── Groups ────────────────────────────────────────────────────────────

  /// `GET /groups`
  fn fetch_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<Group>, RemoteRequestError>> + Send + '_;

  /// `POST /groups`
  fn add_group<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Group, RemoteRequestError>> + Send + 'a;

  /// `PUT /groups/{id}`
  fn update_group<'a>(
    &'a self,
    id: &'a str,
    name: &'a str,
  ) -> impl Future<Output = Result<Group, RemoteRequestError>> + Send + 'a;

  /// `DELETE /groups/{id}`
  fn delete_group<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), RemoteRequestError>> + Send + 'a;

  // ── Clients ───────────────────────────────────────────────────────────

  /// `GET /my/users`, normalised into [`Client`]s.
  fn fetch_clients(
    &self,
  ) -> impl Future<Output = Result<Vec<Client>, RemoteRequestError>> + Send + '_;

  /// `POST /groups/assign`. `None` removes the client from its group.
  /// Returns the server's updated record.
  fn assign_client_group<'a>(
    &'a self,
    client_id: &'a str,
    group_id: Option<&'a str>,
  ) -> impl Future<Output = Result<Client, RemoteRequestError>> + Send + 'a;

  /// `POST /permissions/assign`
  fn assign_client_permission<'a>(
    &'a self,
    client_id: &'a str,
    role: Role,
  ) -> impl Future<Output = Result<(), RemoteRequestError>> + Send + 'a;
}
