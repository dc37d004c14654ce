//! Infrastructure Storage Layer
//!
//! This crate provides the storage primitives the domain layers build on:
//!
//! - [`VersionedStore`]: records keyed by UUID with a monotonically
//!   increasing version and compare-and-swap mutation, giving per-record
//!   optimistic concurrency.
//! - [`AppendLog`]: append-only storage for immutable audit events.
//! - [`OutboxQueue`]: deferred publication to external collaborators with
//!   dedup-key idempotency.
//!
//! The domain crates define their port traits against these primitives;
//! swapping in a database-backed implementation only requires honouring the
//! same version/CAS contract (a record table keyed by claim id with a
//! version column).

pub mod error;
pub mod versioned;
pub mod append_log;
pub mod outbox;

pub use error::StoreError;
pub use versioned::{Versioned, VersionedStore};
pub use append_log::AppendLog;
pub use outbox::{OutboxMessage, OutboxQueue};
