//! The capability set the engine needs from a remote document store

use crate::errors::Result;
use async_trait::async_trait;
use serde_json::{json, Map, Value};

/// A document body: top-level field name to JSON value
pub type Fields = Map<String, Value>;

/// Placeholder asking the store to stamp its own write time
pub fn server_timestamp_sentinel() -> Value {
    json!({ ".sv": "timestamp" })
}

pub fn is_server_timestamp(value: &Value) -> bool {
    *value == server_timestamp_sentinel()
}

/// Remote document store.
///
/// Timeouts and transport retries belong to the implementation; the gateway
/// treats every error the same way.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Create or overwrite the document at `key`
    async fn upsert_document(&self, collection: &str, key: &str, fields: Fields) -> Result<()>;

    /// Every document in `collection`
    async fn get_all_documents(&self, collection: &str) -> Result<Vec<Fields>>;

    /// Remove the document at `key`. Removing a missing document succeeds.
    async fn delete_document(&self, collection: &str, key: &str) -> Result<()>;

    /// Opaque field value the store replaces with its write time
    fn server_timestamp(&self) -> Value {
        server_timestamp_sentinel()
    }
}
