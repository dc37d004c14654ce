//! Append-only log storage
//!
//! Backing primitive for the audit sink: entries are appended and read,
//! never updated or removed.

use std::sync::Arc;

use tokio::sync::RwLock;

/// An append-only, in-memory log
///
/// Clones share the underlying log.
#[derive(Debug, Clone)]
pub struct AppendLog<T> {
    entries: Arc<RwLock<Vec<T>>>,
}

impl<T> Default for AppendLog<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<T: Clone + Send + Sync> AppendLog<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Appends an entry to the log
    pub async fn append(&self, entry: T) {
        self.entries.write().await.push(entry);
    }

    /// Returns a copy of all entries in append order
    pub async fn snapshot(&self) -> Vec<T> {
        self.entries.read().await.clone()
    }

    /// Returns the number of entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing has been appended
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
