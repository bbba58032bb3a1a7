//! Error types for `atrium-gateway`.

use atrium_core::RemoteRequestError;
use thiserror::Error;

/// Reading or writing the stored credentials failed.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("credential file i/o: {0}")]
  Io(#[from] std::io::Error),

  #[error("credential file is not valid json: {0}")]
  Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
  /// `POST /auth` rejected the phone/password pair.
  #[error("invalid phone number or password")]
  InvalidCredentials,

  #[error(transparent)]
  Remote(#[from] RemoteRequestError),

  #[error(transparent)]
  Storage(#[from] StorageError),
}
