//! In-process document store for offline sessions and tests

use crate::errors::Result;
use crate::store::{is_server_timestamp, Fields, RemoteStore};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Collections of documents held in memory.
///
/// Server timestamp placeholders are replaced with the current UTC time on
/// write, the way a real store stamps documents.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Fields>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self, collection: &str, key: &str) -> Option<Fields> {
        self.collections
            .read()
            .get(collection)
            .and_then(|docs| docs.get(key).cloned())
    }

    pub fn keys(&self, collection: &str) -> Vec<String> {
        self.collections
            .read()
            .get(collection)
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Store a raw document, bypassing the record encoding
    pub fn insert_raw(&self, collection: &str, key: &str, fields: Fields) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), fields);
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn upsert_document(&self, collection: &str, key: &str, mut fields: Fields) -> Result<()> {
        let now = Value::String(Utc::now().to_rfc3339());
        for value in fields.values_mut() {
            if is_server_timestamp(value) {
                *value = now.clone();
            }
        }

        self.insert_raw(collection, key, fields);
        Ok(())
    }

    async fn get_all_documents(&self, collection: &str) -> Result<Vec<Fields>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_document(&self, collection: &str, key: &str) -> Result<()> {
        if let Some(docs) = self.collections.write().get_mut(collection) {
            docs.remove(key);
        }
        Ok(())
    }
}
