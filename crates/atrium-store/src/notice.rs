//! Transient, non-blocking messages for the view layer (toasts).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
  Success,
  Info,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub level:   NoticeLevel,
  pub message: String,
}

impl Notice {
  pub fn is_error(&self) -> bool { self.level == NoticeLevel::Error }
}

impl fmt::Display for Notice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let tag = match self.level {
      NoticeLevel::Success => "ok",
      NoticeLevel::Info => "info",
      NoticeLevel::Error => "error",
    };
    write!(f, "[{tag}] {}", self.message)
  }
}
