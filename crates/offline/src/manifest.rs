use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::worker::OfflineError;

pub const DEFAULT_CACHE_NAME: &str = "bill-app-v1.0.0";

pub const DEFAULT_URLS: &[&str] = &[
    "/",
    "/index.html",
    "/assets/css/style.css",
    "/assets/js/app.js",
    "/manifest.json",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css",
];

/// 預先快取的資源清單。 / Assets cached on install, under a versioned cache name.
///
/// Bumping `version` is the only invalidation: activation deletes every
/// cache with a different name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    pub version: String,
    pub urls: Vec<String>,
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self {
            version: DEFAULT_CACHE_NAME.to_string(),
            urls: DEFAULT_URLS.iter().map(|url| url.to_string()).collect(),
        }
    }
}

impl CacheManifest {
    pub fn new(version: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            version: version.into(),
            urls,
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.version
    }

    /// Reads a manifest from JSON (`{"version": ..., "urls": [...]}`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OfflineError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| OfflineError::ReadManifest {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| OfflineError::ParseManifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_lists_app_shell() {
        let manifest = CacheManifest::default();
        assert_eq!(manifest.cache_name(), "bill-app-v1.0.0");
        assert_eq!(manifest.urls.len(), 6);
        assert!(manifest.urls.iter().any(|url| url.ends_with("font-awesome/6.4.0/css/all.min.css")));
    }

    #[test]
    fn manifest_loads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, r#"{"version":"bill-app-v1.1.0","urls":["/","/index.html"]}"#).unwrap();
        let manifest = CacheManifest::load(&path).unwrap();
        assert_eq!(manifest.version, "bill-app-v1.1.0");
        assert_eq!(manifest.urls, vec!["/".to_string(), "/index.html".to_string()]);

        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(
            CacheManifest::load(&path),
            Err(OfflineError::ParseManifest { .. })
        ));
    }
}
