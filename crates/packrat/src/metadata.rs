//! Sidecar file schemas for the filesystem backends.
//!
//! Both schemas are written as pretty-printed JSON with field order
//! matching sorted keys, so the on-disk bytes are deterministic for a
//! given value. External tools reading the store directly depend on this.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

/// Metadata stored alongside each object payload.
///
/// Lives in the metadata area under the same shard prefix as the payload,
/// named `{hash}.json`. Kept separate from the payload so existence checks
/// never touch metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Identifiers referenced by the object, in caller order.
    pub refs: Vec<ObjectId>,
}

/// A single action-cache entry mapping a key to an object id.
///
/// The timestamp records when the association was written and is purely
/// informational; lookups are determined by the key alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The object id associated with the key.
    pub object_id: ObjectId,

    /// When the association was written (RFC 3339).
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(object_id: ObjectId) -> Self {
        Self {
            object_id,
            timestamp: Utc::now(),
        }
    }
}
