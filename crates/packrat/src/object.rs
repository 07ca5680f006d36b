//! The unit of storage: payload bytes plus referenced identifiers.

use crate::id::ObjectId;

/// A stored object: raw payload and an ordered list of referenced ids.
///
/// `refs` lets callers build Merkle-like reference graphs; the storage
/// layer persists and returns the list verbatim without interpreting or
/// traversing it. An object's own identifier is derived from `data` alone,
/// so two objects with the same payload and different refs share an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// Raw payload bytes.
    pub data: Vec<u8>,

    /// Identifiers of objects this one points to.
    pub refs: Vec<ObjectId>,
}

impl Object {
    /// Create an object with no references.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            refs: Vec::new(),
        }
    }

    /// Create an object with references.
    pub fn with_refs(data: Vec<u8>, refs: Vec<ObjectId>) -> Self {
        Self { data, refs }
    }

    /// Create an object from UTF-8 text.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }

    /// The content-derived identifier of this object.
    pub fn id(&self) -> ObjectId {
        ObjectId::from_data(&self.data)
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` for an empty payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_derived_from_payload_only() {
        let bare = Object::new(b"payload".to_vec());
        let with_refs = Object::with_refs(b"payload".to_vec(), vec![ObjectId::new("ref1")]);
        assert_eq!(bare.id(), with_refs.id());
    }

    #[test]
    fn test_from_text() {
        let object = Object::from_text("hello");
        assert_eq!(object.data, b"hello");
        assert!(object.refs.is_empty());
        assert_eq!(object.len(), 5);
    }

    #[test]
    fn test_refs_preserve_order() {
        let refs = vec![ObjectId::new("b"), ObjectId::new("a")];
        let object = Object::with_refs(Vec::new(), refs.clone());
        assert_eq!(object.refs, refs);
        assert!(object.is_empty());
    }
}
