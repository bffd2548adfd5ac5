use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CacheStorage, NetworkError, Request, Response};
use crate::manifest::CacheManifest;

/// 網路傳輸。 / Transport used for pre-caching and cache misses.
pub trait Network {
    fn fetch(&mut self, request: &Request) -> Result<Response, NetworkError>;
}

#[derive(Debug, Error)]
pub enum OfflineError {
    #[error("failed to pre-cache {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: NetworkError,
    },
    #[error("pre-cache of {url} returned status {status}")]
    BadStatus { url: String, status: u16 },
    #[error("failed to read cache manifest {path}: {source}")]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse cache manifest {path}: {source}")]
    ParseManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub cache: String,
    pub stored: usize,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    FromCache(Response),
    FromNetwork(Response),
}

impl FetchOutcome {
    pub fn response(&self) -> &Response {
        match self {
            FetchOutcome::FromCache(response) | FetchOutcome::FromNetwork(response) => response,
        }
    }

    pub fn into_response(self) -> Response {
        match self {
            FetchOutcome::FromCache(response) | FetchOutcome::FromNetwork(response) => response,
        }
    }
}

/// 離線快取工作者。 / Install, fetch and activate handlers for one manifest version.
#[derive(Debug, Clone, Default)]
pub struct OfflineWorker {
    manifest: CacheManifest,
}

impl OfflineWorker {
    pub fn new(manifest: CacheManifest) -> Self {
        Self { manifest }
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    /// 預先快取清單內所有資源。 / Pre-caches every manifest URL.
    ///
    /// All or nothing: if any URL fails or answers with a non-2xx status,
    /// no entry is stored and the error names that URL.
    pub fn install<N: Network + ?Sized>(
        &self,
        storage: &mut CacheStorage,
        network: &mut N,
    ) -> Result<InstallReport, OfflineError> {
        let name = self.manifest.cache_name();
        info!(cache = name, urls = self.manifest.urls.len(), "opened cache");

        let mut fetched = Vec::with_capacity(self.manifest.urls.len());
        for url in &self.manifest.urls {
            let request = Request::get(url.as_str());
            let response = network.fetch(&request).map_err(|source| {
                warn!(url = %url, error = %source, "pre-cache failed");
                OfflineError::Fetch {
                    url: url.clone(),
                    source,
                }
            })?;
            if !response.is_ok() {
                return Err(OfflineError::BadStatus {
                    url: url.clone(),
                    status: response.status,
                });
            }
            fetched.push((request, response));
        }

        let bytes = fetched.iter().map(|(_, response)| response.body.len()).sum();
        let stored = fetched.len();
        let cache = storage.open(name);
        for (request, response) in fetched {
            cache.put(&request, response);
        }
        Ok(InstallReport {
            cache: name.to_string(),
            stored,
            bytes,
        })
    }

    /// 先查快取，否則走網路。 / Cache first, then the network; network errors propagate as-is.
    pub fn fetch<N: Network + ?Sized>(
        &self,
        storage: &CacheStorage,
        network: &mut N,
        request: &Request,
    ) -> Result<FetchOutcome, NetworkError> {
        if let Some(response) = storage.match_request(request) {
            debug!(url = %request.url, "served from cache");
            return Ok(FetchOutcome::FromCache(response.clone()));
        }
        network.fetch(request).map(FetchOutcome::FromNetwork)
    }

    /// Deletes every cache whose name is not the current version.
    pub fn activate(&self, storage: &mut CacheStorage) -> Vec<String> {
        let current = self.manifest.cache_name();
        let stale: Vec<String> = storage
            .keys()
            .into_iter()
            .filter(|name| name != current)
            .collect();
        for name in &stale {
            storage.delete(name);
            info!(cache = %name, "deleted stale cache");
        }
        stale
    }
}
