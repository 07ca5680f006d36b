//! Store configuration with environment-based loading.
//!
//! Environment variables:
//! - `PACKRAT_CAS_PATH`: base path for local storage
//!
//! Default path: `~/.packrat/cas`

use std::env;
use std::path::PathBuf;

/// Configuration for the filesystem backends.
///
/// Objects live in `{base_path}/objects/`, metadata sidecars in
/// `{base_path}/metadata/`, action-cache entries in
/// `{base_path}/action_cache/`.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base path for local storage.
    pub base_path: PathBuf,
}

/// Get the default CAS path (~/.packrat/cas).
fn default_cas_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".packrat").join("cas"))
        .unwrap_or_else(|| PathBuf::from(".packrat/cas"))
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_path: default_cas_path(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from the environment, falling back to the
    /// default path.
    pub fn from_env() -> Self {
        let base_path = env::var("PACKRAT_CAS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_cas_path());

        Self { base_path }
    }

    /// Create a config with a specific base path.
    pub fn with_base_path(path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: path.into(),
        }
    }

    /// Get the objects directory path.
    pub fn objects_dir(&self) -> PathBuf {
        self.base_path.join("objects")
    }

    /// Get the metadata directory path.
    pub fn metadata_dir(&self) -> PathBuf {
        self.base_path.join("metadata")
    }

    /// Get the action-cache directory path.
    pub fn action_cache_dir(&self) -> PathBuf {
        self.base_path.join("action_cache")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert!(config.base_path.to_string_lossy().contains(".packrat"));
    }

    #[test]
    fn test_with_base_path() {
        let config = StoreConfig::with_base_path("/custom/path");
        assert_eq!(config.base_path, PathBuf::from("/custom/path"));
    }

    #[test]
    fn test_area_dirs() {
        let config = StoreConfig::with_base_path("/test/cas");
        assert_eq!(config.objects_dir(), PathBuf::from("/test/cas/objects"));
        assert_eq!(config.metadata_dir(), PathBuf::from("/test/cas/metadata"));
        assert_eq!(
            config.action_cache_dir(),
            PathBuf::from("/test/cas/action_cache")
        );
    }
}
