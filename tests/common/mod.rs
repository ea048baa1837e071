//! Shared helpers and mocks for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use mcl_licensing::Config;
use mcl_licensing::checkout::{CheckoutTransport, TransportResponse};
use mcl_licensing::document::RawDocument;
use mcl_licensing::error::{Error, Result};
use mcl_licensing::storage::StorageAdapter;
use mcl_licensing::store::{DocumentStore, MemoryStore, OrderBy};

pub const WORKER_URL: &str = "https://worker.example/create-checkout-session";

/// Route tracing output to the test harness; filter with RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn test_config() -> Config {
    Config::from_parts(Some(WORKER_URL.to_string()), "https://mcl.example")
}

pub fn config_without_endpoint() -> Config {
    Config::from_parts(None, "https://mcl.example")
}

pub fn doc(id: &str, fields: Value) -> RawDocument {
    RawDocument::from_value(id, fields)
}

/// Seed a memory store collection from JSON objects.
pub async fn seed(store: &MemoryStore, collection: &str, docs: &[Value]) {
    for fields in docs {
        let map = match fields {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        store.add_document(collection, map).await.unwrap();
    }
}

enum Scripted {
    Respond { status: u16, body: String },
    NetworkDown,
}

/// Transport that records every call and replays one scripted response.
pub struct ScriptedTransport {
    script: Scripted,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
}

impl ScriptedTransport {
    pub fn respond(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Scripted::Respond {
                status,
                body: body.to_string(),
            },
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
        })
    }

    pub fn network_down() -> Arc<Self> {
        Arc::new(Self {
            script: Scripted::NetworkDown,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_url(&self) -> Option<String> {
        self.urls.lock().unwrap().last().cloned()
    }

    pub fn last_body(&self) -> Option<Value> {
        self.bodies.lock().unwrap().last().cloned()
    }

    fn reply(&self) -> Result<TransportResponse> {
        match &self.script {
            Scripted::Respond { status, body } => Ok(TransportResponse {
                status: *status,
                body: body.clone(),
            }),
            Scripted::NetworkDown => Err(Error::transport("connection refused")),
        }
    }
}

#[async_trait]
impl CheckoutTransport for ScriptedTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        self.bodies.lock().unwrap().push(body.clone());
        self.reply()
    }

    async fn get(&self, url: &str) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        self.reply()
    }
}

/// Storage whose writes always fail, for the could-not-persist path.
pub struct RejectingStorage;

impl StorageAdapter for RejectingStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Storage("storage disabled".into()))
    }

    fn remove(&self, _key: &str) {}
}

/// Store wrapper that fails reads for the named collections and delegates
/// everything else to an inner memory store.
pub struct FlakyStore {
    pub inner: MemoryStore,
    failing: Vec<String>,
}

impl FlakyStore {
    pub fn new(failing: &[&str]) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: failing.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn read_collection(
        &self,
        name: &str,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<RawDocument>> {
        if self.failing.iter().any(|f| f == name) {
            return Err(Error::transport(format!("backend unavailable for {}", name)));
        }
        self.inner.read_collection(name, order_by).await
    }

    async fn add_document(&self, collection: &str, fields: Map<String, Value>) -> Result<String> {
        self.inner.add_document(collection, fields).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.inner.delete_document(collection, id).await
    }
}
