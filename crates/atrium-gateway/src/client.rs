//! Async HTTP client wrapping the dashboard's JSON API.

use std::{
  sync::{Arc, PoisonError, RwLock},
  time::Duration,
};

use atrium_core::RemoteRequestError;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Connection settings for the remote API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Scheme and host, e.g. `https://admin.example.com`. Endpoints live under
  /// `<base_url>/app`.
  pub base_url: String,
  /// Transport timeout per request.
  pub timeout:  Duration,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:8080".to_string(),
      timeout:  Duration::from_secs(30),
    }
  }
}

/// The current bearer token, shared between the session and every clone of
/// the client.
#[derive(Debug, Clone, Default)]
pub struct TokenCell(Arc<RwLock<Option<String>>>);

impl TokenCell {
  pub fn get(&self) -> Option<String> {
    self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn set(&self, token: Option<String>) {
    *self.0.write().unwrap_or_else(PoisonError::into_inner) = token;
  }

  pub fn is_set(&self) -> bool {
    self.0.read().unwrap_or_else(PoisonError::into_inner).is_some()
  }
}

/// Async HTTP client for the dashboard API.
///
/// Cheap to clone; the inner [`reqwest::Client`] and the [`TokenCell`] are
/// both `Arc`-based, so clones observe login and logout.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
  token:  TokenCell,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self {
      client,
      config,
      token: TokenCell::default(),
    })
  }

  pub fn token(&self) -> &TokenCell { &self.token }

  fn url(&self, path: &str) -> String {
    format!("{}/app{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// A request without credentials; only `POST /auth` uses this.
  pub(crate) fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
    self.client.request(method, self.url(path))
  }

  /// A request carrying the current bearer token. Fails without sending
  /// anything when no token is held.
  pub(crate) fn authed(
    &self,
    method: Method,
    path: &str,
  ) -> Result<RequestBuilder, RemoteRequestError> {
    let token = self.token.get().ok_or(RemoteRequestError::NotAuthenticated)?;
    Ok(self.client.request(method, self.url(path)).bearer_auth(token))
  }

  /// Send `req` and reject non-2xx responses.
  pub(crate) async fn send(
    &self,
    endpoint: &str,
    req: RequestBuilder,
  ) -> Result<Response, RemoteRequestError> {
    tracing::debug!(endpoint, "sending request");
    let resp = req
      .send()
      .await
      .map_err(|e| RemoteRequestError::Transport {
        endpoint: endpoint.to_string(),
        message:  e.to_string(),
      })?;

    let status = resp.status();
    if !status.is_success() {
      tracing::warn!(endpoint, %status, "request rejected");
      return Err(RemoteRequestError::Status {
        endpoint: endpoint.to_string(),
        status:   status.as_u16(),
      });
    }
    Ok(resp)
  }

  /// Deserialise a successful response body.
  pub(crate) async fn json<T: DeserializeOwned>(
    endpoint: &str,
    resp: Response,
  ) -> Result<T, RemoteRequestError> {
    resp.json().await.map_err(|e| RemoteRequestError::Decode {
      endpoint: endpoint.to_string(),
      message:  e.to_string(),
    })
  }
}
