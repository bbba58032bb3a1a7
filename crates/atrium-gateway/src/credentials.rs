//! Durable storage for the bearer token and the identity cache.
//!
//! Two records live side by side and are always cleared together:
//! `jwtToken` (the token and its expiry) and `adminUser` (the last identity
//! resolved for it, kept for display).

use std::{
  path::{Path, PathBuf},
  sync::{Mutex, PoisonError},
};

use atrium_core::entity::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
  pub token:      String,
  pub expires_at: DateTime<Utc>,
}

impl StoredToken {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { self.expires_at <= now }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
  #[serde(rename = "jwtToken", default)]
  pub jwt_token:  Option<StoredToken>,
  #[serde(rename = "adminUser", default)]
  pub admin_user: Option<Identity>,
}

pub trait CredentialStore: Send + Sync {
  /// The stored records; empty when nothing has been saved.
  fn load(&self) -> Result<StoredCredentials, StorageError>;
  fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError>;
  fn clear(&self) -> Result<(), StorageError>;
}

// ─── File ────────────────────────────────────────────────────────────────────

/// Keeps both records in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
  path: PathBuf,
}

impl FileCredentialStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }
}

impl CredentialStore for FileCredentialStore {
  fn load(&self) -> Result<StoredCredentials, StorageError> {
    match std::fs::read_to_string(&self.path) {
      Ok(raw) => Ok(serde_json::from_str(&raw)?),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredCredentials::default()),
      Err(e) => Err(e.into()),
    }
  }

  fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&self.path, serde_json::to_vec_pretty(credentials)?)?;
    Ok(())
  }

  fn clear(&self) -> Result<(), StorageError> {
    match std::fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

// ─── Memory ──────────────────────────────────────────────────────────────────

/// In-process storage, for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
  inner: Mutex<StoredCredentials>,
}

impl MemoryCredentialStore {
  pub fn new(credentials: StoredCredentials) -> Self {
    Self { inner: Mutex::new(credentials) }
  }

  pub fn snapshot(&self) -> StoredCredentials {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }
}

impl CredentialStore for MemoryCredentialStore {
  fn load(&self) -> Result<StoredCredentials, StorageError> { Ok(self.snapshot()) }

  fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
    *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = credentials.clone();
    Ok(())
  }

  fn clear(&self) -> Result<(), StorageError> {
    self.save(&StoredCredentials::default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use atrium_core::Role;
  use chrono::TimeDelta;

  fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
      .join(format!("atrium-credentials-{}-{name}", std::process::id()))
      .join("credentials.json")
  }

  fn sample() -> StoredCredentials {
    StoredCredentials {
      jwt_token:  Some(StoredToken {
        token:      "abc".into(),
        expires_at: Utc::now() + TimeDelta::days(7),
      }),
      admin_user: Some(Identity {
        username: "555-0100".into(),
        name:     "Ada".into(),
        role:     Role::SuperAdmin,
      }),
    }
  }

  #[test]
  fn file_store_round_trips_and_clears() {
    let store = FileCredentialStore::new(scratch_path("round-trip"));
    assert_eq!(store.load().unwrap(), StoredCredentials::default());

    let creds = sample();
    store.save(&creds).unwrap();
    assert_eq!(store.load().unwrap(), creds);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("\"jwtToken\""));
    assert!(raw.contains("\"adminUser\""));

    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), StoredCredentials::default());
    // Clearing twice is fine.
    store.clear().unwrap();
  }

  #[test]
  fn corrupt_file_is_an_error() {
    let store = FileCredentialStore::new(scratch_path("corrupt"));
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "not json").unwrap();
    assert!(matches!(store.load(), Err(StorageError::Json(_))));
    store.clear().unwrap();
  }

  #[test]
  fn expiry_is_inclusive() {
    let now = Utc::now();
    let token = StoredToken { token: "t".into(), expires_at: now };
    assert!(token.is_expired(now));
    assert!(!token.is_expired(now - TimeDelta::seconds(1)));
  }
}
