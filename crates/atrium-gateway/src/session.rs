//! The session provider: login, logout and token-backed identity restore.
//!
//! The session owns the [`TokenCell`](crate::TokenCell) shared by every
//! [`ApiClient`] clone, so a successful login immediately authorises gateway
//! calls and a logout immediately stops them.

use atrium_core::{RemoteRequestError, Role, entity::Identity};
use chrono::{TimeDelta, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{
  client::ApiClient,
  credentials::{CredentialStore, StoredCredentials, StoredToken},
  error::AuthError,
};

#[derive(Serialize)]
struct AuthRequest<'a> {
  phone:    &'a str,
  password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
  token: String,
}

#[derive(Deserialize)]
struct StatusResponse {
  user: StatusUser,
}

#[derive(Deserialize)]
struct StatusUser {
  #[serde(default)]
  phone:           String,
  #[serde(default)]
  name:            String,
  #[serde(default)]
  privilege_level: Option<i64>,
}

impl From<StatusUser> for Identity {
  fn from(u: StatusUser) -> Self {
    Identity {
      username: u.phone,
      name:     u.name,
      role:     u.privilege_level.map(Role::from_privilege_level).unwrap_or_default(),
    }
  }
}

/// Holds the bearer token and the identity it resolves to.
pub struct Session<C> {
  client:       ApiClient,
  credentials:  C,
  token_ttl:    TimeDelta,
  identity:     Option<Identity>,
  initializing: bool,
}

impl<C: CredentialStore> Session<C> {
  /// A session that has not yet looked at stored credentials.
  /// Call [`Session::restore`] before relying on [`Session::current_identity`].
  pub fn new(client: ApiClient, credentials: C, token_ttl: TimeDelta) -> Self {
    Self {
      client,
      credentials,
      token_ttl,
      identity: None,
      initializing: true,
    }
  }

  pub fn current_identity(&self) -> Option<&Identity> { self.identity.as_ref() }

  /// True until the first [`Session::restore`] has finished.
  pub fn is_initializing(&self) -> bool { self.initializing }

  /// A gateway client sharing this session's token.
  pub fn client(&self) -> &ApiClient { &self.client }

  pub fn credentials(&self) -> &C { &self.credentials }

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Exchange the stored token for an identity via `GET /status`.
  ///
  /// Never fails: a missing, expired, rejected or unreadable credential
  /// leaves the session signed out, and a bad credential is discarded.
  pub async fn restore(&mut self) -> Option<&Identity> {
    self.identity = None;
    let stored = match self.credentials.load() {
      Ok(stored) => stored,
      Err(e) => {
        tracing::warn!(error = %e, "could not read stored credentials");
        self.initializing = false;
        return None;
      }
    };

    match stored.jwt_token {
      None => tracing::debug!("no stored token"),
      Some(token) if token.is_expired(Utc::now()) => {
        tracing::info!("stored token has expired");
        self.discard_credentials();
      }
      Some(token) => {
        self.client.token().set(Some(token.token.clone()));
        match self.fetch_identity().await {
          Ok(identity) => {
            tracing::info!(username = %identity.username, role = %identity.role, "session restored");
            self.remember(token, &identity);
            self.identity = Some(identity);
          }
          Err(e) => {
            tracing::warn!(error = %e, "stored token was not accepted");
            self.discard_credentials();
          }
        }
      }
    }

    self.initializing = false;
    self.identity.as_ref()
  }

  /// `POST /auth` with the phone number and password, then resolve the
  /// identity for the returned token.
  pub async fn login(&mut self, phone: &str, password: &str) -> Result<Identity, AuthError> {
    const EP: &str = "POST /auth";
    let req = self
      .client
      .anonymous(Method::POST, "/auth")
      .json(&AuthRequest { phone, password });

    let auth: AuthResponse = match self.client.send(EP, req).await {
      Ok(resp) => ApiClient::json(EP, resp).await?,
      Err(RemoteRequestError::Status { .. }) => {
        tracing::info!(phone, "login rejected");
        return Err(AuthError::InvalidCredentials);
      }
      Err(e) => return Err(e.into()),
    };

    self.client.token().set(Some(auth.token.clone()));
    let identity = match self.fetch_identity().await {
      Ok(identity) => identity,
      Err(e) => {
        self.client.token().set(None);
        return Err(e.into());
      }
    };

    let token = StoredToken {
      token:      auth.token,
      expires_at: Utc::now() + self.token_ttl,
    };
    self.credentials.save(&StoredCredentials {
      jwt_token:  Some(token),
      admin_user: Some(identity.clone()),
    })?;

    tracing::info!(username = %identity.username, role = %identity.role, "logged in");
    self.identity = Some(identity.clone());
    self.initializing = false;
    Ok(identity)
  }

  /// Forget the token, the identity and both stored records.
  pub fn logout(&mut self) {
    self.identity = None;
    self.discard_credentials();
    tracing::info!("logged out");
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn fetch_identity(&self) -> Result<Identity, RemoteRequestError> {
    const EP: &str = "GET /status";
    let req = self.client.authed(Method::GET, "/status")?;
    let resp = self.client.send(EP, req).await?;
    let status: StatusResponse = ApiClient::json(EP, resp).await?;
    Ok(status.user.into())
  }

  fn remember(&self, token: StoredToken, identity: &Identity) {
    let stored = StoredCredentials {
      jwt_token:  Some(token),
      admin_user: Some(identity.clone()),
    };
    if let Err(e) = self.credentials.save(&stored) {
      tracing::warn!(error = %e, "could not refresh the identity cache");
    }
  }

  fn discard_credentials(&self) {
    self.client.token().set(None);
    if let Err(e) = self.credentials.clear() {
      tracing::warn!(error = %e, "could not clear stored credentials");
    }
  }
}
