//! Narrow contract to the external document store.
//!
//! The store itself is a black box; the core only needs ordered reads for
//! the admin views, a write for the purchase form's customer record, and a
//! delete for handled inbox items.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::{RawDocument, decode_instant};
use crate::error::Result;

/// Collection names used by the site.
pub mod collections {
    pub const LICENSES: &str = "licenses";
    pub const CUSTOMERS: &str = "customers";
    pub const IDEAS: &str = "ideas";
    pub const MESSAGES: &str = "messages";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }
}

/// The document store as the core sees it.
///
/// `read_collection` returns documents ordered by the requested field when
/// one is given; without one the return order is unspecified and callers
/// must not depend on it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read_collection(
        &self,
        name: &str,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<RawDocument>>;

    /// Store a new document; the store assigns and returns the id.
    async fn add_document(&self, collection: &str, fields: Map<String, Value>) -> Result<String>;

    /// Delete a document. Deleting an id that is already gone is not an
    /// error.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;
}

/// In-memory store for tests and consumers without a backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<RawDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read_collection(
        &self,
        name: &str,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<RawDocument>> {
        let collections = self.collections.read().await;
        let mut docs = collections.get(name).cloned().unwrap_or_default();
        if let Some(order) = order_by {
            sort_documents(&mut docs, order);
        }
        Ok(docs)
    }

    async fn add_document(&self, collection: &str, fields: Map<String, Value>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(RawDocument::new(id.clone(), fields));
        Ok(id)
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.retain(|doc| doc.id != id);
        }
        Ok(())
    }
}

/// Sort documents by one field. Documents lacking the field sort last
/// regardless of direction.
pub(crate) fn sort_documents(docs: &mut [RawDocument], order: &OrderBy) {
    docs.sort_by(|a, b| {
        let cmp = match (a.get(&order.field), b.get(&order.field)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (Some(x), Some(y)) => compare_values(x, y),
        };
        match order.direction {
            Direction::Ascending => cmp,
            Direction::Descending => cmp.reverse(),
        }
    });
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (decode_instant(a), decode_instant(b)) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    match (a.as_str(), b.as_str()) {
        (Some(x), Some(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Read access with the dashboard's soft-failure semantics layered on top of
/// the raw store contract.
#[derive(Clone)]
pub struct CollectionReader {
    store: Arc<dyn DocumentStore>,
}

impl CollectionReader {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Hard read: backend failures propagate. Used where the caller must
    /// distinguish "no documents" from "could not read".
    pub async fn read(
        &self,
        name: &str,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<RawDocument>> {
        self.store.read_collection(name, order_by).await
    }

    /// Soft read: a missing collection or backend failure yields an empty
    /// list and a warning, so one dead data source cannot blank a whole
    /// dashboard.
    pub async fn read_or_empty(&self, name: &str, order_by: Option<&OrderBy>) -> Vec<RawDocument> {
        match self.read(name, order_by).await {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!(collection = %name, error = %e, "collection read failed, rendering empty");
                Vec::new()
            }
        }
    }

    /// Newest-first read on `createdAt`, the ordering every admin list uses.
    pub async fn read_newest(&self, name: &str) -> Vec<RawDocument> {
        self.read_or_empty(name, Some(&OrderBy::desc("createdAt")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_orders_descending_with_missing_fields_last() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            for (id, created) in [("a", json!(100)), ("b", json!(300)), ("c", json!(200))] {
                let mut fields = Map::new();
                fields.insert("createdAt".into(), created);
                store.collections.write().await.entry("items".into()).or_default().push(
                    RawDocument::new(id, fields),
                );
            }
            store
                .collections
                .write()
                .await
                .get_mut("items")
                .unwrap()
                .push(RawDocument::new("d", Map::new()));

            let docs = store
                .read_collection("items", Some(&OrderBy::desc("createdAt")))
                .await
                .unwrap();
            let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
            assert_eq!(ids, vec!["b", "c", "a", "d"]);
        });
    }

    #[test]
    fn missing_collection_reads_empty() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let docs = store.read_collection("nope", None).await.unwrap();
            assert!(docs.is_empty());
        });
    }

    #[test]
    fn delete_is_idempotent() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let id = store.add_document("items", Map::new()).await.unwrap();
            store.delete_document("items", &id).await.unwrap();
            store.delete_document("items", &id).await.unwrap();
            assert!(store.read_collection("items", None).await.unwrap().is_empty());
        });
    }
}
