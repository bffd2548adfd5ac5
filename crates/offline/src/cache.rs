use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    pub url: String,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    pub fn ok(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(url, 200, body)
    }

    /// 2xx status.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("request to {url} failed: {reason}")]
    Unreachable { url: String, reason: String },
}

/// 單一具名快取。 / One named cache of responses keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    entries: HashMap<String, Response>,
}

impl Cache {
    pub fn put(&mut self, request: &Request, response: Response) {
        self.entries.insert(request.url.clone(), response);
    }

    pub fn get(&self, request: &Request) -> Option<&Response> {
        self.entries.get(&request.url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All caches the worker can see, by name.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: BTreeMap<String, Cache>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named cache, creating it when absent.
    pub fn open(&mut self, name: &str) -> &mut Cache {
        self.caches.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&Cache> {
        self.caches.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    pub fn delete(&mut self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    /// Cache names in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    /// 在所有快取中尋找。 / Looks the request up across every cache, in name order.
    pub fn match_request(&self, request: &Request) -> Option<&Response> {
        self.caches.values().find_map(|cache| cache.get(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_searches_every_cache() {
        let mut storage = CacheStorage::new();
        let request = Request::get("/index.html");
        storage
            .open("bill-app-v0.9.0")
            .put(&request, Response::ok("/index.html", "old"));
        storage.open("bill-app-v1.0.0");

        let hit = storage.match_request(&request).unwrap();
        assert_eq!(hit.body, b"old");
        assert!(storage.match_request(&Request::get("/missing")).is_none());
        assert_eq!(storage.keys(), vec!["bill-app-v0.9.0", "bill-app-v1.0.0"]);
    }

    #[test]
    fn status_classification() {
        assert!(Response::ok("/", "").is_ok());
        assert!(!Response::new("/", 404, "").is_ok());
    }
}
