//! Error types for `atrium-core`.

use thiserror::Error;

/// The collection an id was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
  Document,
  Event,
  Client,
  Group,
  PersonalNote,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("{kind} not found: {id}")]
  NotFound { kind: EntityKind, id: String },
}

impl Error {
  pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
    Self::NotFound { kind, id: id.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure of a single call against the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteRequestError {
  /// No bearer token was available; no request was sent.
  #[error("not authenticated")]
  NotAuthenticated,

  /// An id that the server expects to be numeric was not.
  #[error("{endpoint}: invalid id {id:?}")]
  InvalidId { endpoint: String, id: String },

  #[error("{endpoint} returned {status}")]
  Status { endpoint: String, status: u16 },

  #[error("{endpoint} failed: {message}")]
  Transport { endpoint: String, message: String },

  #[error("could not decode {endpoint} response: {message}")]
  Decode { endpoint: String, message: String },
}
