//! FileActionCache: filesystem key→object map for build-result memoization.
//!
//! Entries are sharded exactly like objects:
//! ```text
//! {base_path}/action_cache/
//! ├── ab/
//! │   └── ab91fe....json   # {"object_id": "...", "timestamp": "..."}
//! └── 7c/
//!     └── 7c02d1....json
//! ```
//!
//! Unlike payloads, entries are mutable associations: every write replaces
//! the previous file. Last write wins; there is no versioning of prior
//! values.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::error::{CasError, CasResult};
use crate::id::ObjectId;
use crate::metadata::CacheEntry;

/// Key→object lookup for memoizing previously produced results.
///
/// Keys are arbitrary identifiers, not content-derived; the cache never
/// inspects them beyond sharding.
#[async_trait]
pub trait ActionCache: Send + Sync {
    /// Associate `value` with `key`, replacing any previous association.
    async fn put(&self, key: &ObjectId, value: &ObjectId) -> CasResult<()>;

    /// Look up the object id previously associated with `key`.
    ///
    /// Returns `Ok(None)` if no association exists. A malformed entry is
    /// an error, not an absence.
    async fn lookup(&self, key: &ObjectId) -> CasResult<Option<ObjectId>>;
}

/// Filesystem-backed action cache.
#[derive(Debug)]
pub struct FileActionCache {
    cache_dir: PathBuf,
    lock: Mutex<()>,
}

impl FileActionCache {
    /// Create an action cache under the configured base path.
    ///
    /// Root creation is best-effort, matching
    /// [`FileStore::new`](crate::store::FileStore::new): failures surface
    /// from the first write.
    pub fn new(config: StoreConfig) -> Self {
        let cache_dir = config.action_cache_dir();
        let _ = std::fs::create_dir_all(&cache_dir);

        Self {
            cache_dir,
            lock: Mutex::new(()),
        }
    }

    /// Create a FileActionCache at a specific base path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::with_base_path(path))
    }

    fn entry_path(&self, key: &ObjectId) -> PathBuf {
        self.cache_dir
            .join(key.prefix())
            .join(format!("{}.json", key))
    }

    /// Remove every entry and re-create the empty root.
    ///
    /// Best-effort: removal or re-creation failures are swallowed, the
    /// cache is advisory state.
    pub async fn clear(&self) {
        let _guard = self.lock.lock().await;
        let _ = fs::remove_dir_all(&self.cache_dir).await;
        let _ = fs::create_dir_all(&self.cache_dir).await;
    }
}

#[async_trait]
impl ActionCache for FileActionCache {
    async fn put(&self, key: &ObjectId, value: &ObjectId) -> CasResult<()> {
        let _guard = self.lock.lock().await;

        let entry_file = self.entry_path(key);
        if let Some(parent) = entry_file.parent() {
            fs::create_dir_all(parent).await?;
        }

        let entry = CacheEntry::new(value.clone());
        let json = serde_json::to_string_pretty(&entry).map_err(CasError::Encoding)?;
        fs::write(&entry_file, json).await?;

        tracing::debug!(key = %key.short(), value = %value.short(), "cached association");
        Ok(())
    }

    async fn lookup(&self, key: &ObjectId) -> CasResult<Option<ObjectId>> {
        let _guard = self.lock.lock().await;

        match fs::read(self.entry_path(key)).await {
            Ok(bytes) => {
                let entry: CacheEntry = serde_json::from_slice(&bytes).map_err(|e| {
                    CasError::Decoding(format!("action-cache entry for {}: {e}", key.short()))
                })?;
                Ok(Some(entry.object_id))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_and_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileActionCache::at_path(temp_dir.path());

        let key = ObjectId::from_data(b"action digest");
        let value = ObjectId::from_data(b"build output");

        cache.put(&key, &value).await.unwrap();
        let found = cache.lookup(&key).await.unwrap();
        assert_eq!(found, Some(value));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileActionCache::at_path(temp_dir.path());

        let key = ObjectId::new("key-id");
        let first = ObjectId::new("value-1");
        let second = ObjectId::new("value-2");

        cache.put(&key, &first).await.unwrap();
        cache.put(&key, &second).await.unwrap();

        assert_eq!(cache.lookup(&key).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_lookup_absent_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileActionCache::at_path(temp_dir.path());

        let key = ObjectId::new("never-written");
        assert!(cache.lookup(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_corrupt_entry_errors() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileActionCache::at_path(temp_dir.path());

        let key = ObjectId::new("key-id");
        cache.put(&key, &ObjectId::new("value-id")).await.unwrap();

        let entry_file = temp_dir
            .path()
            .join("action_cache")
            .join(key.prefix())
            .join(format!("{}.json", key));
        std::fs::write(entry_file, b"{ truncated").unwrap();

        let result = cache.lookup(&key).await;
        assert!(matches!(result, Err(CasError::Decoding(_))));
    }

    #[tokio::test]
    async fn test_clear_removes_entries() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileActionCache::at_path(temp_dir.path());

        let key = ObjectId::new("key-id");
        cache.put(&key, &ObjectId::new("value-id")).await.unwrap();

        cache.clear().await;
        assert!(cache.lookup(&key).await.unwrap().is_none());
        assert!(temp_dir.path().join("action_cache").exists());
    }

    #[tokio::test]
    async fn test_entries_shard_by_key_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileActionCache::at_path(temp_dir.path());

        let key = ObjectId::from_data(b"sharded key");
        cache.put(&key, &ObjectId::new("value-id")).await.unwrap();

        let entry_file = temp_dir
            .path()
            .join("action_cache")
            .join(key.prefix())
            .join(format!("{}.json", key));
        assert!(entry_file.exists());
    }
}
