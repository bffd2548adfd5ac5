//! Offline cache shim for the bill app.
//!
//! [`OfflineWorker`] pre-caches a fixed [`CacheManifest`] on install, answers
//! requests cache-first, and drops caches from older versions on activate.
//! Network access goes through the [`Network`] trait so hosts and tests can
//! supply their own transport.

mod cache;
mod manifest;
mod worker;

pub use cache::{Cache, CacheStorage, NetworkError, Request, Response};
pub use manifest::{CacheManifest, DEFAULT_CACHE_NAME, DEFAULT_URLS};
pub use worker::{FetchOutcome, InstallReport, Network, OfflineError, OfflineWorker};
