//! Versioned record storage with compare-and-swap semantics
//!
//! Each stored record carries a monotonically increasing version. All
//! mutations go through [`VersionedStore::compare_and_swap`], so two
//! concurrent writers racing on the same record cannot both succeed
//! against the same prior version; the loser receives a
//! [`StoreError::Conflict`] and retries against the new state.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;

/// A record together with its storage version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    pub fn new(value: T) -> Self {
        Self { value, version: 1 }
    }
}

/// In-memory versioned store keyed by UUID
///
/// Cloning is cheap; clones share the same underlying map, mirroring how a
/// connection pool handle would be passed around.
#[derive(Debug, Clone)]
pub struct VersionedStore<T> {
    entity: &'static str,
    records: Arc<RwLock<HashMap<Uuid, Versioned<T>>>>,
}

impl<T: Clone + Send + Sync> VersionedStore<T> {
    /// Creates an empty store; `entity` names the record type in errors
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Inserts a new record at version 1
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if a record with this id already exists.
    pub async fn insert(&self, id: Uuid, value: T) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&id) {
            return Err(StoreError::Duplicate {
                entity: self.entity,
                id: id.to_string(),
            });
        }
        records.insert(id, Versioned::new(value));
        Ok(1)
    }

    /// Fetches a record with its current version
    pub async fn get(&self, id: Uuid) -> Result<Versioned<T>, StoreError> {
        let records = self.records.read().await;
        records.get(&id).cloned().ok_or(StoreError::NotFound {
            entity: self.entity,
            id: id.to_string(),
        })
    }

    /// Replaces a record if and only if the stored version matches
    ///
    /// Returns the new version on success. A mismatch means another writer
    /// won the race; the caller re-reads and retries the whole operation.
    pub async fn compare_and_swap(
        &self,
        id: Uuid,
        expected_version: u64,
        value: T,
    ) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let entry = records.get_mut(&id).ok_or(StoreError::NotFound {
            entity: self.entity,
            id: id.to_string(),
        })?;
        if entry.version != expected_version {
            return Err(StoreError::Conflict {
                entity: self.entity,
                id: id.to_string(),
                expected: expected_version,
                actual: entry.version,
            });
        }
        entry.value = value;
        entry.version += 1;
        Ok(entry.version)
    }

    /// Returns a point-in-time copy of all records
    ///
    /// Batch readers (fraud scan, forecaster, compliance sweep) work on
    /// this copy and therefore hold no lock across lifecycle writers.
    pub async fn snapshot(&self) -> Vec<Versioned<T>> {
        let records = self.records.read().await;
        records.values().cloned().collect()
    }

    /// Returns the number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store: VersionedStore<String> = VersionedStore::new("note");
        let id = Uuid::new_v4();

        store.insert(id, "first".to_string()).await.unwrap();
        let found = store.get(id).await.unwrap();

        assert_eq!(found.value, "first");
        assert_eq!(found.version, 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store: VersionedStore<String> = VersionedStore::new("note");
        let id = Uuid::new_v4();

        store.insert(id, "first".to_string()).await.unwrap();
        let result = store.insert(id, "again".to_string()).await;

        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_cas_bumps_version() {
        let store: VersionedStore<String> = VersionedStore::new("note");
        let id = Uuid::new_v4();
        store.insert(id, "v1".to_string()).await.unwrap();

        let v2 = store.compare_and_swap(id, 1, "v2".to_string()).await.unwrap();
        assert_eq!(v2, 2);
        assert_eq!(store.get(id).await.unwrap().value, "v2");
    }

    #[tokio::test]
    async fn test_cas_stale_version_conflicts() {
        let store: VersionedStore<String> = VersionedStore::new("note");
        let id = Uuid::new_v4();
        store.insert(id, "v1".to_string()).await.unwrap();
        store.compare_and_swap(id, 1, "v2".to_string()).await.unwrap();

        let stale = store.compare_and_swap(id, 1, "v2b".to_string()).await;
        match stale {
            Err(StoreError::Conflict { expected, actual, .. }) => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 2);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_cas_exactly_one_wins() {
        let store: VersionedStore<u32> = VersionedStore::new("counter");
        let id = Uuid::new_v4();
        store.insert(id, 0).await.unwrap();

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.compare_and_swap(id, 1, 10).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.compare_and_swap(id, 1, 20).await })
        };

        let ra = a.await.unwrap();
        let rb = b.await.unwrap();
        assert!(ra.is_ok() ^ rb.is_ok());
        assert_eq!(store.get(id).await.unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_snapshot_is_point_in_time() {
        let store: VersionedStore<u32> = VersionedStore::new("counter");
        let id = Uuid::new_v4();
        store.insert(id, 1).await.unwrap();

        let snapshot = store.snapshot().await;
        store.compare_and_swap(id, 1, 2).await.unwrap();

        assert_eq!(snapshot[0].value, 1);
        assert_eq!(store.get(id).await.unwrap().value, 2);
    }
}
