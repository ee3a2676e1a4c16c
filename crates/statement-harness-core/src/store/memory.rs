//! In-memory [`KeyStore`] implementation for tests and embedding.
//!
//! Uses a `HashMap` of per-user `HashSet`s behind `std::sync::RwLock`.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::KeyStore;

/// In-memory key store.
pub struct InMemoryKeyStore {
    keys: RwLock<HashMap<String, HashSet<String>>>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Store pre-seeded with keys for one user.
    pub fn with_keys<I, S>(user_id: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut map) = store.keys.write() {
            map.insert(
                user_id.to_string(),
                keys.into_iter().map(Into::into).collect(),
            );
        }
        store
    }
}

impl Default for InMemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn list_keys(&self, user_id: &str) -> Result<HashSet<String>> {
        let map = self.keys.read().map_err(|e| anyhow!("lock poisoned: {}", e))?;
        Ok(map.get(user_id).cloned().unwrap_or_default())
    }

    async fn record_keys(&self, user_id: &str, keys: &[String]) -> Result<usize> {
        let mut map = self.keys.write().map_err(|e| anyhow!("lock poisoned: {}", e))?;
        let set = map.entry(user_id.to_string()).or_default();
        Ok(keys.iter().filter(|k| set.insert((*k).clone())).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_user_is_empty() {
        let store = InMemoryKeyStore::new();
        assert!(store.list_keys("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_is_idempotent_and_per_user() {
        let store = InMemoryKeyStore::new();
        let keys = vec!["k1".to_string(), "k2".to_string()];
        assert_eq!(store.record_keys("u1", &keys).await.unwrap(), 2);
        assert_eq!(store.record_keys("u1", &keys).await.unwrap(), 0);

        let listed = store.list_keys("u1").await.unwrap();
        assert!(listed.contains("k1") && listed.contains("k2"));
        assert!(store.list_keys("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_with_keys_seeds_user() {
        let store = InMemoryKeyStore::with_keys("u1", ["a", "b"]);
        assert_eq!(store.list_keys("u1").await.unwrap().len(), 2);
    }
}
