//! Gateway and session tests against an in-process axum stand-in for the
//! dashboard API.

use std::{
  sync::{Arc, Mutex},
  time::Duration,
};

use atrium_core::{RemoteRequestError, Role, entity::ClientStatus, gateway::RemoteGateway};
use axum::{
  Json, Router,
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  routing::{get, post, put},
};
use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};

use crate::{
  ApiClient, ApiConfig, AuthError, CredentialStore, MemoryCredentialStore, Session,
  StoredCredentials, StoredToken,
};

const TOKEN: &str = "good-token";

// ─── Stub backend ────────────────────────────────────────────────────────────

struct Backend {
  groups:        Vec<Value>,
  users:         Vec<Value>,
  next_group_id: i64,
  assignments:   Vec<Value>,
  permissions:   Vec<Value>,
}

type Shared = Arc<Mutex<Backend>>;

impl Backend {
  fn seeded() -> Self {
    Self {
      groups:        vec![
        json!({ "id": 1, "name": "VIP", "created_at": "2025-01-10" }),
        json!({ "id": 2, "name": "Trial", "createdAt": "2025-02-01T12:00:00Z" }),
      ],
      users:         vec![
        json!({
          "id": 1,
          "name": "Acme Corp",
          "email": "contact@acme.com",
          "phone": "555-1234",
          "privilege_level": 3,
          "join_date": "2024-01-15T00:00:00Z",
          "group_id": 1
        }),
        json!({
          "id": 2,
          "name": "Widget Inc",
          "email": "info@widget.com",
          "phone": "555-5678",
          "status": "inactive",
          "privilege_level": 2,
          "joinedDate": "2024-02-20",
          "group_id": null
        }),
        json!({
          "id": "3",
          "name": "Ada Admin",
          "privilege_level": 1,
          "created_at": "2023-11-05"
        }),
      ],
      next_group_id: 3,
      assignments:   Vec::new(),
      permissions:   Vec::new(),
    }
  }
}

fn authorized(headers: &HeaderMap) -> Result<(), StatusCode> {
  let expected = format!("Bearer {TOKEN}");
  match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
    Some(v) if v == expected => Ok(()),
    _ => Err(StatusCode::UNAUTHORIZED),
  }
}

async fn auth(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
  if body["phone"] == "555-0100" && body["password"] == "secret" {
    Ok(Json(json!({ "token": TOKEN, "role": 1 })))
  } else {
    Err(StatusCode::UNAUTHORIZED)
  }
}

async fn status(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
  authorized(&headers)?;
  Ok(Json(json!({
    "user": { "phone": "555-0100", "name": "Ada Admin", "privilege_level": 1 }
  })))
}

async fn list_groups(
  State(backend): State<Shared>,
  headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
  authorized(&headers)?;
  Ok(Json(Value::Array(backend.lock().unwrap().groups.clone())))
}

async fn create_group(
  State(backend): State<Shared>,
  headers: HeaderMap,
  Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
  authorized(&headers)?;
  let mut b = backend.lock().unwrap();
  let group = json!({
    "id": b.next_group_id,
    "name": body["name"],
    "created_at": "2025-05-01T09:30:00Z"
  });
  b.next_group_id += 1;
  b.groups.push(group.clone());
  Ok(Json(group))
}

async fn update_group(
  State(backend): State<Shared>,
  headers: HeaderMap,
  Path(id): Path<String>,
  Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
  authorized(&headers)?;
  let mut b = backend.lock().unwrap();
  let group = b
    .groups
    .iter_mut()
    .find(|g| g["id"].to_string() == id)
    .ok_or(StatusCode::NOT_FOUND)?;
  group["name"] = body["name"].clone();
  Ok(Json(json!({
    "id": group["id"],
    "name": group["name"],
    "createdAt": "2025-05-01"
  })))
}

async fn delete_group(
  State(backend): State<Shared>,
  headers: HeaderMap,
  Path(id): Path<String>,
) -> StatusCode {
  if authorized(&headers).is_err() {
    return StatusCode::UNAUTHORIZED;
  }
  let mut b = backend.lock().unwrap();
  let before = b.groups.len();
  b.groups.retain(|g| g["id"].to_string() != id);
  if b.groups.len() == before {
    StatusCode::NOT_FOUND
  } else {
    StatusCode::NO_CONTENT
  }
}

async fn list_users(
  State(backend): State<Shared>,
  headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
  authorized(&headers)?;
  Ok(Json(Value::Array(backend.lock().unwrap().users.clone())))
}

async fn assign_group(
  State(backend): State<Shared>,
  headers: HeaderMap,
  Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
  authorized(&headers)?;
  let mut b = backend.lock().unwrap();
  b.assignments.push(body.clone());
  let user_id = body["user_id"].as_i64().ok_or(StatusCode::BAD_REQUEST)?;
  let user = b
    .users
    .iter_mut()
    .find(|u| u["id"].as_i64() == Some(user_id))
    .ok_or(StatusCode::NOT_FOUND)?;
  user["group_id"] = body.get("group_id").cloned().unwrap_or(Value::Null);
  Ok(Json(user.clone()))
}

async fn assign_permission(
  State(backend): State<Shared>,
  headers: HeaderMap,
  Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
  authorized(&headers)?;
  backend.lock().unwrap().permissions.push(body);
  Ok(Json(json!({ "ok": true })))
}

/// Serve the stub on an ephemeral port and return a client pointed at it.
async fn spawn(backend: Shared) -> ApiClient {
  let app = Router::new()
    .route("/app/auth", post(auth))
    .route("/app/status", get(status))
    .route("/app/groups", get(list_groups).post(create_group))
    .route("/app/groups/assign", post(assign_group))
    .route("/app/groups/{id}", put(update_group).delete(delete_group))
    .route("/app/my/users", get(list_users))
    .route("/app/permissions/assign", post(assign_permission))
    .with_state(backend);

  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });

  ApiClient::new(ApiConfig {
    base_url: format!("http://{addr}/"),
    timeout:  Duration::from_secs(5),
  })
  .unwrap()
}

async fn signed_in() -> (ApiClient, Shared) {
  let backend = Arc::new(Mutex::new(Backend::seeded()));
  let client = spawn(backend.clone()).await;
  client.token().set(Some(TOKEN.to_string()));
  (client, backend)
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn calls_without_token_short_circuit() {
  let backend = Arc::new(Mutex::new(Backend::seeded()));
  let client = spawn(backend.clone()).await;

  assert_eq!(client.fetch_groups().await, Err(RemoteRequestError::NotAuthenticated));
  assert_eq!(client.fetch_clients().await, Err(RemoteRequestError::NotAuthenticated));
  assert_eq!(
    client.assign_client_group("1", Some("2")).await,
    Err(RemoteRequestError::NotAuthenticated)
  );
  assert_eq!(
    client.assign_client_permission("1", Role::Moderator).await,
    Err(RemoteRequestError::NotAuthenticated)
  );
  assert!(backend.lock().unwrap().assignments.is_empty());
  assert!(backend.lock().unwrap().permissions.is_empty());
}

#[tokio::test]
async fn rejected_token_is_a_status_error() {
  let (client, _) = signed_in().await;
  client.token().set(Some("stale".into()));
  assert!(matches!(
    client.fetch_groups().await,
    Err(RemoteRequestError::Status { status: 401, .. })
  ));
}

#[tokio::test]
async fn fetch_clients_normalises_records() {
  let (client, _) = signed_in().await;
  let clients = client.fetch_clients().await.unwrap();
  assert_eq!(clients.len(), 3);

  let acme = &clients[0];
  assert_eq!(acme.id, "1");
  assert_eq!(acme.permissions, Role::Client);
  assert_eq!(acme.joined_date.to_string(), "2024-01-15");
  assert_eq!(acme.group_id.as_deref(), Some("1"));
  assert_eq!(acme.status, ClientStatus::Active);

  let widget = &clients[1];
  assert_eq!(widget.permissions, Role::Moderator);
  assert_eq!(widget.status, ClientStatus::Inactive);
  assert_eq!(widget.joined_date.to_string(), "2024-02-20");
  assert_eq!(widget.group_id, None);

  let ada = &clients[2];
  assert_eq!(ada.id, "3");
  assert_eq!(ada.permissions, Role::SuperAdmin);
  assert_eq!(ada.joined_date.to_string(), "2023-11-05");
  assert_eq!(ada.email, "");
}

#[tokio::test]
async fn group_crud_round_trip() {
  let (client, _) = signed_in().await;

  let groups = client.fetch_groups().await.unwrap();
  assert_eq!(groups.len(), 2);
  assert_eq!(groups[1].created_at.to_string(), "2025-02-01");

  let added = client.add_group("Partners").await.unwrap();
  assert_eq!(added.id, "3");
  assert_eq!(added.name, "Partners");
  assert_eq!(added.created_at.to_string(), "2025-05-01");

  let renamed = client.update_group(&added.id, "Key partners").await.unwrap();
  assert_eq!(renamed.id, "3");
  assert_eq!(renamed.name, "Key partners");

  client.delete_group(&added.id).await.unwrap();
  let ids: Vec<_> = client
    .fetch_groups()
    .await
    .unwrap()
    .into_iter()
    .map(|g| g.id)
    .collect();
  assert_eq!(ids, ["1", "2"]);
}

#[tokio::test]
async fn deleting_unknown_group_fails() {
  let (client, _) = signed_in().await;
  assert!(matches!(
    client.delete_group("99").await,
    Err(RemoteRequestError::Status { status: 404, .. })
  ));
}

#[tokio::test]
async fn assign_group_sends_numeric_ids() {
  let (client, backend) = signed_in().await;

  let updated = client.assign_client_group("2", Some("1")).await.unwrap();
  assert_eq!(updated.id, "2");
  assert_eq!(updated.group_id.as_deref(), Some("1"));

  let cleared = client.assign_client_group("1", None).await.unwrap();
  assert_eq!(cleared.group_id, None);

  let b = backend.lock().unwrap();
  assert_eq!(b.assignments[0], json!({ "user_id": 2, "group_id": 1 }));
  assert_eq!(b.assignments[1], json!({ "user_id": 1 }));
}

#[tokio::test]
async fn non_numeric_ids_are_refused_before_sending() {
  let (client, backend) = signed_in().await;
  assert!(matches!(
    client.assign_client_group("abc", None).await,
    Err(RemoteRequestError::InvalidId { .. })
  ));
  assert!(backend.lock().unwrap().assignments.is_empty());
}

#[tokio::test]
async fn permission_assignment_uses_level_tokens() {
  let (client, backend) = signed_in().await;
  client.assign_client_permission("1", Role::SuperAdmin).await.unwrap();
  client.assign_client_permission("2", Role::Moderator).await.unwrap();
  client.assign_client_permission("3", Role::Client).await.unwrap();

  let b = backend.lock().unwrap();
  assert_eq!(b.permissions, vec![
    json!({ "user_id": 1, "privilege": "LEVEL_SUPER_ADMIN" }),
    json!({ "user_id": 2, "privilege": "LEVEL_MODERATOR" }),
    json!({ "user_id": 3, "privilege": "LEVEL_BASIC_USER" }),
  ]);
}

// ─── Session ─────────────────────────────────────────────────────────────────

async fn session_with(stored: StoredCredentials) -> Session<MemoryCredentialStore> {
  let backend = Arc::new(Mutex::new(Backend::seeded()));
  let client = spawn(backend).await;
  Session::new(client, MemoryCredentialStore::new(stored), TimeDelta::days(7))
}

fn stored_token(token: &str, expires_in: TimeDelta) -> StoredCredentials {
  StoredCredentials {
    jwt_token:  Some(StoredToken {
      token:      token.into(),
      expires_at: Utc::now() + expires_in,
    }),
    admin_user: None,
  }
}

#[tokio::test]
async fn login_stores_token_and_identity() {
  let mut session = session_with(StoredCredentials::default()).await;
  assert!(session.is_initializing());

  let identity = session.login("555-0100", "secret").await.unwrap();
  assert_eq!(identity.username, "555-0100");
  assert_eq!(identity.name, "Ada Admin");
  assert_eq!(identity.role, Role::SuperAdmin);
  assert_eq!(session.current_identity(), Some(&identity));
  assert_eq!(session.client().token().get().as_deref(), Some(TOKEN));

  let stored = session.credentials().snapshot();
  let token = stored.jwt_token.unwrap();
  assert_eq!(token.token, TOKEN);
  assert!(token.expires_at > Utc::now() + TimeDelta::days(6));
  assert_eq!(stored.admin_user, Some(identity));

  // The gateway shares the token.
  assert_eq!(session.client().fetch_groups().await.unwrap().len(), 2);
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
  let mut session = session_with(StoredCredentials::default()).await;
  let err = session.login("555-0100", "nope").await.unwrap_err();
  assert!(matches!(err, AuthError::InvalidCredentials));
  assert!(session.current_identity().is_none());
  assert!(!session.client().token().is_set());
}

#[tokio::test]
async fn restore_resolves_a_valid_token() {
  let mut session = session_with(stored_token(TOKEN, TimeDelta::days(1))).await;
  let identity = session.restore().await.cloned();
  assert_eq!(identity.map(|i| i.role), Some(Role::SuperAdmin));
  assert!(!session.is_initializing());
  assert!(session.credentials().snapshot().admin_user.is_some());
}

#[tokio::test]
async fn restore_discards_an_expired_token() {
  let mut session = session_with(stored_token(TOKEN, TimeDelta::hours(-1))).await;
  assert!(session.restore().await.is_none());
  assert!(!session.is_initializing());
  assert!(!session.client().token().is_set());
  assert_eq!(session.credentials().load().unwrap(), StoredCredentials::default());
}

#[tokio::test]
async fn restore_discards_a_rejected_token() {
  let mut session = session_with(stored_token("forged", TimeDelta::days(1))).await;
  assert!(session.restore().await.is_none());
  assert!(!session.client().token().is_set());
  assert_eq!(session.credentials().snapshot(), StoredCredentials::default());
}

#[tokio::test]
async fn logout_clears_everything() {
  let mut session = session_with(StoredCredentials::default()).await;
  session.login("555-0100", "secret").await.unwrap();
  session.logout();

  assert!(session.current_identity().is_none());
  assert!(!session.client().token().is_set());
  assert_eq!(session.credentials().snapshot(), StoredCredentials::default());
  assert_eq!(
    session.client().fetch_clients().await,
    Err(RemoteRequestError::NotAuthenticated)
  );
}
