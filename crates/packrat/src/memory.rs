//! In-memory backend implementing both capability contracts.
//!
//! Intended for tests and embedding. Objects and action-cache entries are
//! held in `HashMap`s behind the same per-instance serialization as the
//! other backends; values are cloned on read and write.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::action_cache::ActionCache;
use crate::error::CasResult;
use crate::id::ObjectId;
use crate::object::Object;
use crate::store::ObjectStore;

#[derive(Debug, Default)]
struct Inner {
    objects: HashMap<ObjectId, Object>,
    action_cache: HashMap<ObjectId, ObjectId>,
}

/// `HashMap`-backed store and action cache.
#[derive(Debug, Default)]
pub struct MemoryCas {
    inner: Mutex<Inner>,
}

impl MemoryCas {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently stored.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.objects.len()
    }

    /// Returns `true` if no objects are stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.objects.is_empty()
    }

    /// Drop all objects and action-cache entries.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.objects.clear();
        inner.action_cache.clear();
    }
}

#[async_trait]
impl ObjectStore for MemoryCas {
    async fn store(&self, object: &Object) -> CasResult<ObjectId> {
        let id = object.id();
        let mut inner = self.inner.lock().await;
        match inner.objects.entry(id.clone()) {
            // Payload already present and correct; refs are a mutable
            // association and follow the latest store, like the sidecar
            // rewrite in the filesystem backend.
            Entry::Occupied(mut entry) => entry.get_mut().refs = object.refs.clone(),
            Entry::Vacant(entry) => {
                entry.insert(object.clone());
            }
        }
        Ok(id)
    }

    async fn load(&self, id: &ObjectId) -> CasResult<Option<Object>> {
        Ok(self.inner.lock().await.objects.get(id).cloned())
    }

    async fn contains(&self, id: &ObjectId) -> CasResult<bool> {
        Ok(self.inner.lock().await.objects.contains_key(id))
    }

    async fn delete(&self, id: &ObjectId) -> CasResult<()> {
        self.inner.lock().await.objects.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ActionCache for MemoryCas {
    async fn put(&self, key: &ObjectId, value: &ObjectId) -> CasResult<()> {
        self.inner
            .lock()
            .await
            .action_cache
            .insert(key.clone(), value.clone());
        Ok(())
    }

    async fn lookup(&self, key: &ObjectId) -> CasResult<Option<ObjectId>> {
        Ok(self.inner.lock().await.action_cache.get(key).cloned())
    }
}
