use std::collections::HashMap;

use voltbill_offline::{
    CacheManifest, CacheStorage, FetchOutcome, Network, NetworkError, OfflineError, OfflineWorker,
    Request, Response, DEFAULT_CACHE_NAME,
};

#[derive(Default)]
struct FakeNetwork {
    routes: HashMap<String, Response>,
    calls: Vec<String>,
}

impl FakeNetwork {
    fn serving(urls: &[String]) -> Self {
        let routes = urls
            .iter()
            .map(|url| (url.clone(), Response::ok(url.clone(), format!("body of {url}"))))
            .collect();
        Self {
            routes,
            calls: Vec::new(),
        }
    }
}

impl Network for FakeNetwork {
    fn fetch(&mut self, request: &Request) -> Result<Response, NetworkError> {
        self.calls.push(request.url.clone());
        self.routes
            .get(&request.url)
            .cloned()
            .ok_or_else(|| NetworkError::Unreachable {
                url: request.url.clone(),
                reason: "offline".into(),
            })
    }
}

#[test]
fn install_then_serve_from_cache() {
    let worker = OfflineWorker::default();
    let mut network = FakeNetwork::serving(&worker.manifest().urls);
    let mut storage = CacheStorage::new();

    let report = worker.install(&mut storage, &mut network).unwrap();
    assert_eq!(report.cache, DEFAULT_CACHE_NAME);
    assert_eq!(report.stored, 6);
    assert_eq!(storage.get(DEFAULT_CACHE_NAME).unwrap().len(), 6);

    network.calls.clear();
    let outcome = worker
        .fetch(&storage, &mut network, &Request::get("/index.html"))
        .unwrap();
    assert!(matches!(outcome, FetchOutcome::FromCache(_)));
    assert_eq!(outcome.response().body, b"body of /index.html");
    assert!(network.calls.is_empty());
}

#[test]
fn install_is_all_or_nothing() {
    let worker = OfflineWorker::default();
    let mut urls = worker.manifest().urls.clone();
    urls.retain(|url| url != "/manifest.json");
    let mut network = FakeNetwork::serving(&urls);
    let mut storage = CacheStorage::new();

    let err = worker.install(&mut storage, &mut network).unwrap_err();
    assert!(matches!(err, OfflineError::Fetch { ref url, .. } if url == "/manifest.json"));
    assert!(storage.match_request(&Request::get("/")).is_none());
}

#[test]
fn non_ok_status_aborts_install() {
    let manifest = CacheManifest::new("bill-app-v2", vec!["/".into(), "/gone".into()]);
    let worker = OfflineWorker::new(manifest);
    let mut network = FakeNetwork::serving(&["/".to_string()]);
    network
        .routes
        .insert("/gone".into(), Response::new("/gone", 404, "not found"));
    let mut storage = CacheStorage::new();

    let err = worker.install(&mut storage, &mut network).unwrap_err();
    assert!(matches!(err, OfflineError::BadStatus { status: 404, .. }));
    assert!(!storage.has("bill-app-v2"));
}

#[test]
fn miss_goes_to_network_and_errors_propagate() {
    let worker = OfflineWorker::default();
    let mut network = FakeNetwork::serving(&["/api/usage".to_string()]);
    let storage = CacheStorage::new();

    let outcome = worker
        .fetch(&storage, &mut network, &Request::get("/api/usage"))
        .unwrap();
    assert!(matches!(outcome, FetchOutcome::FromNetwork(_)));

    let err = worker
        .fetch(&storage, &mut network, &Request::get("/nowhere"))
        .unwrap_err();
    assert_eq!(
        err,
        NetworkError::Unreachable {
            url: "/nowhere".into(),
            reason: "offline".into(),
        }
    );
}

#[test]
fn activate_removes_old_versions_only() {
    let worker = OfflineWorker::default();
    let mut storage = CacheStorage::new();
    storage.open("bill-app-v0.9.0");
    storage.open("bill-app-v0.9.5");
    storage.open(DEFAULT_CACHE_NAME);

    let deleted = worker.activate(&mut storage);
    assert_eq!(deleted, vec!["bill-app-v0.9.0", "bill-app-v0.9.5"]);
    assert_eq!(storage.keys(), vec![DEFAULT_CACHE_NAME]);
    assert!(worker.activate(&mut storage).is_empty());
}
