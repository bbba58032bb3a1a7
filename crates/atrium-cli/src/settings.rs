//! Layered configuration: defaults, then `atrium.toml`, then `ATRIUM_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use atrium_gateway::ApiConfig;
use chrono::TimeDelta;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Server origin; endpoints live under `<base_url>/app`.
  pub base_url:             String,
  /// JSON file holding the stored token and identity. A leading `~/` is
  /// expanded.
  pub credential_path:      PathBuf,
  pub token_ttl_days:       i64,
  pub request_timeout_secs: u64,
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("base_url", "http://localhost:8080")?
      .set_default("credential_path", "~/.config/atrium/credentials.json")?
      .set_default("token_ttl_days", 7_i64)?
      .set_default("request_timeout_secs", 30_i64)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ATRIUM"))
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.credential_path = expand_tilde(&settings.credential_path);
    Ok(settings)
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      base_url: self.base_url.trim_end_matches('/').to_string(),
      timeout:  Duration::from_secs(self.request_timeout_secs),
    }
  }

  pub fn token_ttl(&self) -> TimeDelta { TimeDelta::days(self.token_ttl_days) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
