//! [`RemoteGateway`] over HTTP.

use atrium_core::{
  RemoteRequestError, Role,
  entity::{Client, Group},
  gateway::RemoteGateway,
};
use chrono::Utc;
use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{client::ApiClient, decode};

#[derive(Serialize)]
struct AssignGroupBody {
  user_id:  i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  group_id: Option<i64>,
}

#[derive(Serialize)]
struct AssignPermissionBody {
  user_id:   i64,
  privilege: &'static str,
}

/// The server wants numeric ids in request bodies.
fn numeric_id(endpoint: &str, id: &str) -> Result<i64, RemoteRequestError> {
  id.trim().parse().map_err(|_| RemoteRequestError::InvalidId {
    endpoint: endpoint.to_string(),
    id:       id.to_string(),
  })
}

fn decode_error(endpoint: &str, message: String) -> RemoteRequestError {
  RemoteRequestError::Decode {
    endpoint: endpoint.to_string(),
    message,
  }
}

impl RemoteGateway for ApiClient {
  // ── Groups ──────────────────────────────────────────────────────────────

  async fn fetch_groups(&self) -> Result<Vec<Group>, RemoteRequestError> {
    const EP: &str = "GET /groups";
    let req = self.authed(Method::GET, "/groups")?;
    let resp = self.send(EP, req).await?;
    let body: Value = Self::json(EP, resp).await?;
    decode::decode_groups(&body, Utc::now().date_naive()).map_err(|m| decode_error(EP, m))
  }

  async fn add_group(&self, name: &str) -> Result<Group, RemoteRequestError> {
    const EP: &str = "POST /groups";
    let req = self.authed(Method::POST, "/groups")?.json(&json!({ "name": name }));
    let resp = self.send(EP, req).await?;
    let body: Value = Self::json(EP, resp).await?;
    decode::decode_group(&body, Utc::now().date_naive()).map_err(|m| decode_error(EP, m))
  }

  async fn update_group(&self, id: &str, name: &str) -> Result<Group, RemoteRequestError> {
    const EP: &str = "PUT /groups/{id}";
    let req = self
      .authed(Method::PUT, &format!("/groups/{id}"))?
      .json(&json!({ "name": name }));
    let resp = self.send(EP, req).await?;
    let body: Value = Self::json(EP, resp).await?;
    decode::decode_group(&body, Utc::now().date_naive()).map_err(|m| decode_error(EP, m))
  }

  async fn delete_group(&self, id: &str) -> Result<(), RemoteRequestError> {
    const EP: &str = "DELETE /groups/{id}";
    let req = self.authed(Method::DELETE, &format!("/groups/{id}"))?;
    self.send(EP, req).await?;
    Ok(())
  }

  // ── Clients ─────────────────────────────────────────────────────────────

  async fn fetch_clients(&self) -> Result<Vec<Client>, RemoteRequestError> {
    const EP: &str = "GET /my/users";
    let req = self.authed(Method::GET, "/my/users")?;
    let resp = self.send(EP, req).await?;
    let body: Value = Self::json(EP, resp).await?;
    decode::decode_users(&body, Utc::now().date_naive()).map_err(|m| decode_error(EP, m))
  }

  async fn assign_client_group(
    &self,
    client_id: &str,
    group_id: Option<&str>,
  ) -> Result<Client, RemoteRequestError> {
    const EP: &str = "POST /groups/assign";
    let req = self.authed(Method::POST, "/groups/assign")?;
    let body = AssignGroupBody {
      user_id:  numeric_id(EP, client_id)?,
      group_id: group_id.map(|g| numeric_id(EP, g)).transpose()?,
    };
    let req = req.json(&body);
    let resp = self.send(EP, req).await?;
    let record: Value = Self::json(EP, resp).await?;
    Ok(decode::decode_user(&record, Utc::now().date_naive()))
  }

  async fn assign_client_permission(
    &self,
    client_id: &str,
    role: Role,
  ) -> Result<(), RemoteRequestError> {
    const EP: &str = "POST /permissions/assign";
    let req = self.authed(Method::POST, "/permissions/assign")?;
    let body = AssignPermissionBody {
      user_id:   numeric_id(EP, client_id)?,
      privilege: role.privilege_token(),
    };
    let req = req.json(&body);
    self.send(EP, req).await?;
    Ok(())
  }
}
