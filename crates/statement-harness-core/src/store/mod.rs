//! Persisted-key storage abstraction.
//!
//! The [`KeyStore`] trait is the only view the pipeline has of the caller's
//! transaction store: the set of identity keys already recorded for a user.
//! Backends (SQLite, in-memory) must be `Send + Sync` so one instance can be
//! shared across request handlers.

pub mod memory;

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

/// Per-user set of persisted transaction keys.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`list_keys`](KeyStore::list_keys) | All keys recorded for a user |
/// | [`record_keys`](KeyStore::record_keys) | Add keys for a user, ignoring ones already present |
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// All keys recorded for `user_id`. Unknown users yield an empty set.
    async fn list_keys(&self, user_id: &str) -> Result<HashSet<String>>;

    /// Record keys for `user_id`. Returns how many were newly added.
    async fn record_keys(&self, user_id: &str, keys: &[String]) -> Result<usize>;
}
