//! Core types and trait definitions for the Atrium dashboard.
//!
//! This crate is deliberately free of HTTP and storage dependencies. The
//! gateway, store and binary crates all depend on it.

pub mod calendar;
pub mod clock;
pub mod entity;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod message;
pub mod role;

pub use error::{EntityKind, Error, RemoteRequestError, Result};
pub use role::Role;
