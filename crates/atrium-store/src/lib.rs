//! In-memory state for the Atrium dashboard.
//!
//! [`DataStore`] owns the local collections (documents, events, notifications,
//! personal notes) and the mirrors of the server-owned ones (clients, groups).
//! It talks to the server only through an
//! [`atrium_core::gateway::RemoteGateway`].

mod seed;
mod store;

pub mod notice;
pub mod sync;

pub use notice::{Notice, NoticeLevel};
pub use store::DataStore;
pub use sync::{SyncOutcome, SyncTicket};
