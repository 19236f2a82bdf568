//! Document store reached over a JSON REST endpoint
//!
//! `PUT {endpoint}/{collection}/{key}` writes a document, `DELETE` removes it
//! and `GET {endpoint}/{collection}` lists the collection, either as an array
//! of documents or as an object keyed by document key.

use crate::errors::{Result, SyncError};
use crate::store::{Fields, RemoteStore};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct HttpStore {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpStore {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SyncError::transport(format!("invalid endpoint {endpoint}: {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(SyncError::transport(format!(
                "endpoint {endpoint} cannot hold document paths"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::transport(format!("Failed to create client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn upsert_document(&self, collection: &str, key: &str, fields: Fields) -> Result<()> {
        let url = self.url_for(&[collection, key]);
        debug!("PUT {}", url);

        self.client
            .put(url)
            .json(&fields)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn get_all_documents(&self, collection: &str) -> Result<Vec<Fields>> {
        let url = self.url_for(&[collection]);
        debug!("GET {}", url);

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        documents_from_listing(serde_json::from_str(&body)?)
    }

    async fn delete_document(&self, collection: &str, key: &str) -> Result<()> {
        let url = self.url_for(&[collection, key]);
        debug!("DELETE {}", url);

        let response = self.client.delete(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        response.error_for_status()?;
        Ok(())
    }
}

// Entries that are not JSON objects are dropped here; decoding decides what
// counts as a usable document.
fn documents_from_listing(listing: Value) -> Result<Vec<Fields>> {
    let entries: Vec<Value> = match listing {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, doc)| doc).collect(),
        other => {
            return Err(SyncError::transport(format!(
                "unexpected collection listing: {other}"
            )))
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|doc| match doc {
            Value::Object(fields) => Some(fields),
            _ => None,
        })
        .collect())
}
