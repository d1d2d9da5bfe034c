//! Durable key-value storage for the session document.
//!
//! The store API is blocking. The session calls it from the blocking pool, one
//! write at a time, so writes land in the order edits were issued.

pub mod file_store;
pub mod memory;
pub mod persistence;
pub mod redis_store;

use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use persistence::{PersistenceAdapter, STORAGE_KEY};
pub use redis_store::RedisStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Invalid key '{0}'")]
    InvalidKey(String),
}

/// Minimal string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Opens the store named by `url`.
///
/// - `redis://…` / `rediss://…` → Redis
/// - `memory://` → process memory (nothing survives a restart)
/// - `file://<dir>` or a bare path → one JSON file per key under `<dir>`
pub fn open_store(url: &str) -> Result<Arc<dyn KeyValueStore>> {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        let store = RedisStore::open(url).context("Failed to open Redis store")?;
        info!("Using Redis store");
        return Ok(Arc::new(store));
    }

    if url == "memory://" {
        info!("Using in-memory store; data will not survive a restart");
        return Ok(Arc::new(MemoryStore::default()));
    }

    let dir = url.strip_prefix("file://").unwrap_or(url);
    let store = FileStore::open(dir)
        .with_context(|| format!("Failed to open file store at '{dir}'"))?;
    info!("Using file store at {}", store.dir().display());
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory_store() {
        let store = open_store("memory://").unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_open_file_store_with_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("file://{}", dir.path().display());
        let store = open_store(&url).unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
