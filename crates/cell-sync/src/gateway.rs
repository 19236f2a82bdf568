//! Persisting and rehydrating the painted-cell set
//!
//! Writes are best effort: each record is sent on its own, a failure is
//! logged and reported back, and nothing is rolled back or retried. The last
//! write to reach the store for a cell wins.

use crate::document::{decode_record, encode_record};
use crate::errors::{Result, SyncError};
use crate::store::RemoteStore;
use futures::future::join_all;
use paint_grid_core::telemetry::{log_event, Stopwatch};
use paint_grid_core::{CellId, PaintedCellRecord};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_COLLECTION: &str = "paintedCells";

/// Per-record results of a persist or retract call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistReport {
    pub succeeded: Vec<CellId>,
    pub failed: Vec<(CellId, SyncError)>,
}

impl PersistReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    fn record(&mut self, id: CellId, result: Result<()>) {
        match result {
            Ok(()) => self.succeeded.push(id),
            Err(err) => self.failed.push((id, err)),
        }
    }
}

/// Session-owned handle to the remote store
#[derive(Clone)]
pub struct SyncGateway {
    store: Arc<dyn RemoteStore>,
    collection: String,
}

impl SyncGateway {
    pub fn new(store: Arc<dyn RemoteStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Upsert one document per record, keyed by cell id.
    ///
    /// Never fails as a whole. Failed writes are logged and listed in the
    /// report. An empty input does nothing.
    pub async fn persist(&self, records: &[PaintedCellRecord]) -> PersistReport {
        let watch = Stopwatch::start();
        log_event("STORE_SAVE", "START", None, Some(&records.len()));

        if records.is_empty() {
            log_event(
                "STORE_SAVE",
                "END",
                Some(watch.elapsed_secs()),
                Some(&"no cells to save"),
            );
            return PersistReport::default();
        }

        let writes = records.iter().map(|record| async move {
            let fields = encode_record(record, self.store.server_timestamp());
            let result = self
                .store
                .upsert_document(&self.collection, record.id.as_str(), fields)
                .await;

            match &result {
                Ok(()) => log_event(
                    "STORE_SAVE",
                    "END",
                    Some(watch.elapsed_secs()),
                    Some(&record.id),
                ),
                Err(err) => log_event(
                    "STORE_SAVE",
                    "ERROR",
                    None,
                    Some(&format_args!("{}: {}", record.id, err)),
                ),
            }
            (record.id.clone(), result)
        });

        let mut report = PersistReport::default();
        for (id, result) in join_all(writes).await {
            report.record(id, result);
        }

        if !report.is_clean() {
            warn!(
                "{} of {} cell writes to {} failed",
                report.failed.len(),
                report.attempted(),
                self.store.name()
            );
        }
        report
    }

    /// Delete the documents of unpainted cells, with the same best-effort
    /// reporting as [`SyncGateway::persist`]
    pub async fn retract(&self, ids: &[CellId]) -> PersistReport {
        let watch = Stopwatch::start();

        let deletes = ids.iter().map(|id| async move {
            let result = self
                .store
                .delete_document(&self.collection, id.as_str())
                .await;

            match &result {
                Ok(()) => log_event("STORE_DELETE", "END", Some(watch.elapsed_secs()), Some(id)),
                Err(err) => log_event(
                    "STORE_DELETE",
                    "ERROR",
                    None,
                    Some(&format_args!("{}: {}", id, err)),
                ),
            }
            (id.clone(), result)
        });

        let mut report = PersistReport::default();
        for (id, result) in join_all(deletes).await {
            report.record(id, result);
        }
        report
    }

    /// Read every stored cell.
    ///
    /// Malformed documents are skipped. A transport error is returned as is,
    /// so the caller can keep its current set.
    pub async fn fetch_all(&self) -> Result<Vec<PaintedCellRecord>> {
        let watch = Stopwatch::start();
        log_event("STORE_FETCH", "START", None, None);

        let documents = match self.store.get_all_documents(&self.collection).await {
            Ok(documents) => documents,
            Err(err) => {
                log_event("STORE_FETCH", "ERROR", None, Some(&err));
                return Err(err);
            }
        };

        let mut records = Vec::with_capacity(documents.len());
        for fields in &documents {
            match decode_record(fields) {
                Ok(record) => records.push(record),
                Err(err) => {
                    debug!("Skipping stored cell: {}", err);
                    log_event("STORE_FETCH", "SKIP", None, Some(&err));
                }
            }
        }

        log_event(
            "STORE_FETCH",
            "END",
            Some(watch.elapsed_secs()),
            Some(&format_args!(
                "{} of {} documents loaded",
                records.len(),
                documents.len()
            )),
        );
        Ok(records)
    }
}

impl std::fmt::Debug for SyncGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncGateway")
            .field("store", &self.store.name())
            .field("collection", &self.collection)
            .finish()
    }
}
