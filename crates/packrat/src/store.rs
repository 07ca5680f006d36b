//! FileStore: filesystem-backed content-addressable storage.
//!
//! Implements the ObjectStore trait on a local filesystem with directory
//! sharding.
//!
//! Layout:
//! ```text
//! {base_path}/
//! ├── objects/
//! │   ├── ab/
//! │   │   └── ab3f9c...      # payload bytes, named by the full hash
//! │   └── 12/
//! │       └── 12e078...
//! └── metadata/
//!     ├── ab/
//!     │   └── ab3f9c....json # {"refs": [...]}
//!     └── 12/
//!         └── 12e078....json
//! ```
//!
//! Payload files are write-once: the identifier is derived from the bytes,
//! so an existing file already holds the correct content. The refs sidecar
//! is rewritten on every store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::error::{CasError, CasResult};
use crate::id::ObjectId;
use crate::metadata::ObjectMetadata;
use crate::object::Object;

/// Content-addressed object storage.
///
/// Implemented by [`FileStore`], [`RemoteCas`](crate::RemoteCas), and
/// [`MemoryCas`](crate::MemoryCas), so callers can swap a local cache for
/// a network cache without code changes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object, returning its identifier.
    ///
    /// Idempotent: storing the same payload twice yields the same id and
    /// leaves the stored bytes unchanged.
    async fn store(&self, object: &Object) -> CasResult<ObjectId>;

    /// Load an object by id.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    async fn load(&self, id: &ObjectId) -> CasResult<Option<Object>>;

    /// Check whether an object exists without reading it.
    async fn contains(&self, id: &ObjectId) -> CasResult<bool>;

    /// Remove an object. Deleting an absent id is not an error.
    async fn delete(&self, id: &ObjectId) -> CasResult<()>;
}

/// Filesystem-backed store with two-character directory sharding.
///
/// All operations on one instance are serialized; a `load` observes a
/// fully written `store` from the same instance, never a partial file.
/// Instances pointed at the same directory are not coordinated.
#[derive(Debug)]
pub struct FileStore {
    config: StoreConfig,
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store over the configured base path.
    ///
    /// Directory creation here is best-effort: a failure surfaces later
    /// as an I/O error from the first write, not from construction.
    pub fn new(config: StoreConfig) -> Self {
        let _ = std::fs::create_dir_all(config.objects_dir());
        let _ = std::fs::create_dir_all(config.metadata_dir());

        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    /// Create a FileStore at a specific path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::with_base_path(path))
    }

    /// Get the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the payload file for an id.
    fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.config
            .objects_dir()
            .join(id.prefix())
            .join(id.as_str())
    }

    /// Path of the refs sidecar for an id.
    fn metadata_path(&self, id: &ObjectId) -> PathBuf {
        self.config
            .metadata_dir()
            .join(id.prefix())
            .join(format!("{}.json", id))
    }

    /// Enumerate every stored identifier.
    ///
    /// Filenames are the raw hash strings, so ids are reconstructed from
    /// them directly; the shard directory name is not cross-checked. No
    /// ordering guarantee.
    pub async fn list_objects(&self) -> CasResult<Vec<ObjectId>> {
        let _guard = self.lock.lock().await;

        let mut ids = Vec::new();
        let mut shards = match fs::read_dir(self.config.objects_dir()).await {
            Ok(shards) => shards,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => return Err(e.into()),
        };

        while let Some(shard) = shards.next_entry().await? {
            let mut files = fs::read_dir(shard.path()).await?;
            while let Some(file) = files.next_entry().await? {
                ids.push(ObjectId::new(file.file_name().to_string_lossy()));
            }
        }

        Ok(ids)
    }

    /// Total bytes of stored payloads. Metadata sidecars are excluded.
    pub async fn size(&self) -> CasResult<u64> {
        let _guard = self.lock.lock().await;

        let mut total = 0u64;
        let mut shards = match fs::read_dir(self.config.objects_dir()).await {
            Ok(shards) => shards,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        while let Some(shard) = shards.next_entry().await? {
            let mut files = fs::read_dir(shard.path()).await?;
            while let Some(file) = files.next_entry().await? {
                total += file.metadata().await?.len();
            }
        }

        Ok(total)
    }
}

#[async_trait]
impl ObjectStore for FileStore {
    async fn store(&self, object: &Object) -> CasResult<ObjectId> {
        let _guard = self.lock.lock().await;

        let id = object.id();
        let object_file = self.object_path(&id);
        let metadata_file = self.metadata_path(&id);

        // Shard directories must exist before either write. Unlike the
        // creation in `new`, a failure here propagates.
        if let Some(parent) = object_file.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Some(parent) = metadata_file.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write payload only if absent (content-addressed = idempotent).
        if !fs::try_exists(&object_file).await? {
            fs::write(&object_file, &object.data).await?;
        }

        // The refs sidecar is a mutable association and is always
        // rewritten; identical refs produce identical bytes.
        let metadata = ObjectMetadata {
            refs: object.refs.clone(),
        };
        let json = serde_json::to_string_pretty(&metadata).map_err(CasError::Encoding)?;
        fs::write(&metadata_file, json).await?;

        tracing::debug!(id = %id.short(), bytes = object.data.len(), "stored object");
        Ok(id)
    }

    async fn load(&self, id: &ObjectId) -> CasResult<Option<Object>> {
        let _guard = self.lock.lock().await;

        let data = match fs::read(self.object_path(id)).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let refs = match fs::read(self.metadata_path(id)).await {
            Ok(bytes) => {
                let metadata: ObjectMetadata = serde_json::from_slice(&bytes).map_err(|e| {
                    CasError::Decoding(format!("metadata for {}: {e}", id.short()))
                })?;
                metadata.refs
            }
            // Missing sidecar: tolerate partial or legacy writes.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(Object { data, refs }))
    }

    async fn contains(&self, id: &ObjectId) -> CasResult<bool> {
        let _guard = self.lock.lock().await;
        Ok(fs::try_exists(self.object_path(id)).await?)
    }

    async fn delete(&self, id: &ObjectId) -> CasResult<()> {
        let _guard = self.lock.lock().await;

        // Best-effort on both files: absence of either is not an error.
        let _ = fs::remove_file(self.object_path(id)).await;
        let _ = fs::remove_file(self.metadata_path(id)).await;
        Ok(())
    }
}
