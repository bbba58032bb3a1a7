//! Fencing for remote-mirror refreshes.
//!
//! Each refresh is tagged with the store's generation at the time it was
//! issued. A result is only applied while that generation is still current,
//! so a slow response can never overwrite the mirrors of a newer identity.

use atrium_core::entity::Identity;

/// Issued by `DataStore::begin_sync`; hand it back to `apply_sync`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTicket {
  pub(crate) generation: u64,
  pub(crate) identity:   Option<Identity>,
}

impl SyncTicket {
  pub fn generation(&self) -> u64 { self.generation }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
  /// Both mirrors were replaced.
  Applied,
  /// At least one fetch failed. For the same identity that mirror was left
  /// as it was; after an identity switch it was emptied.
  Incomplete,
  /// A newer refresh was issued meanwhile; nothing was applied.
  Stale,
}
