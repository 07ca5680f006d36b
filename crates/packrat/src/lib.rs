//! Content-addressable storage for build-result caching.
//!
//! packrat stores immutable objects addressed by the SHA-256 of their
//! payload, alongside an action cache that maps arbitrary keys to object
//! ids for memoizing previously produced results. Three interchangeable
//! backends implement the same two contracts ([`ObjectStore`] and
//! [`ActionCache`]):
//!
//! - [`FileStore`] / [`FileActionCache`]: sharded local filesystem
//! - [`RemoteCas`]: HTTP service speaking the `cas/objects` +
//!   `cas/action-cache` wire protocol (implements both contracts)
//! - [`MemoryCas`]: `HashMap`-backed, for tests and embedding
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use packrat::{FileStore, Object, ObjectStore, StoreConfig};
//!
//! # async fn example() -> packrat::CasResult<()> {
//! // Create from environment (reads PACKRAT_CAS_PATH)
//! let store = FileStore::new(StoreConfig::from_env());
//!
//! // Or at a specific path
//! let store = FileStore::at_path("/var/cache/packrat");
//!
//! // Store content
//! let id = store.store(&Object::from_text("Hello, World!")).await?;
//! println!("Stored as: {}", id);
//!
//! // Retrieve content
//! if let Some(object) = store.load(&id).await? {
//!     println!("Got {} bytes", object.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `PACKRAT_CAS_PATH`: base path for local storage (default:
//!   `~/.packrat/cas`)
//! - `PACKRAT_REMOTE_URL`: remote service URL for
//!   [`factory::remote_from_env`]
//!
//! # Shared storage
//!
//! The filesystem layout is designed for shared access: payloads are
//! write-once (content-addressed, no conflicts), and distinct instances
//! over the same root need no coordination for objects. Action-cache
//! entries are last-write-wins; coordinating concurrent writers to the
//! same key is the caller's responsibility.

pub mod action_cache;
pub mod config;
pub mod error;
pub mod factory;
pub mod id;
pub mod memory;
pub mod metadata;
pub mod object;
pub mod remote;
pub mod store;

// Re-exports for convenience
pub use action_cache::{ActionCache, FileActionCache};
pub use config::StoreConfig;
pub use error::{CasError, CasResult};
pub use factory::{remote_from_env, ConfigError};
pub use id::ObjectId;
pub use memory::MemoryCas;
pub use metadata::{CacheEntry, ObjectMetadata};
pub use object::Object;
pub use remote::{RemoteCas, RemoteOptions};
pub use store::{FileStore, ObjectStore};
