//! Roles and the server's privilege encodings.
//!
//! The server speaks two encodings: a numeric `privilege_level` on user
//! records and a `LEVEL_*` token when assigning privileges. The dashboard only
//! ever works with [`Role`].

use serde::{Deserialize, Serialize};

/// Permission level of a client or of the signed-in identity.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Role {
  #[serde(rename = "super admin")]
  #[strum(to_string = "super admin", serialize = "super-admin")]
  SuperAdmin,
  #[serde(rename = "moderator")]
  #[strum(to_string = "moderator")]
  Moderator,
  #[default]
  #[serde(rename = "client")]
  #[strum(to_string = "client")]
  Client,
}

impl Role {
  /// Decode a server `privilege_level`. Anything other than 1 or 2 is a
  /// plain client.
  pub fn from_privilege_level(level: i64) -> Self {
    match level {
      1 => Self::SuperAdmin,
      2 => Self::Moderator,
      _ => Self::Client,
    }
  }

  pub fn privilege_level(self) -> u8 {
    match self {
      Self::SuperAdmin => 1,
      Self::Moderator => 2,
      Self::Client => 3,
    }
  }

  /// The token `POST /permissions/assign` expects in its `privilege` field.
  pub fn privilege_token(self) -> &'static str {
    match self {
      Self::SuperAdmin => "LEVEL_SUPER_ADMIN",
      Self::Moderator => "LEVEL_MODERATOR",
      Self::Client => "LEVEL_BASIC_USER",
    }
  }

  /// Only super admins may change other users' permissions.
  pub fn can_manage_permissions(self) -> bool { matches!(self, Self::SuperAdmin) }
}
