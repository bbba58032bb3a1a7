//! HTTP side of the Atrium dashboard.
//!
//! [`ApiClient`] implements [`atrium_core::gateway::RemoteGateway`] against
//! the server's `/app` endpoints; [`Session`] handles login, logout and
//! restoring a stored token. Both share one bearer token.

pub mod client;
pub mod credentials;
pub mod decode;
pub mod error;
pub mod session;

mod gateway;

pub use client::{ApiClient, ApiConfig, TokenCell};
pub use credentials::{
  CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredCredentials, StoredToken,
};
pub use error::{AuthError, StorageError};
pub use session::Session;

#[cfg(test)]
mod tests;
