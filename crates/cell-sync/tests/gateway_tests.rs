use async_trait::async_trait;
use paint_grid_core::{
    BoundingRegion, GeoCoordinate, GridDimensions, GridIndex, PaintColor, PaintedCellRecord,
};
use paint_grid_sync::{
    Fields, MemoryStore, RemoteStore, Result, SyncError, SyncGateway, DEFAULT_COLLECTION,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

/// Store that fails writes for chosen keys and can go offline
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing_keys: Mutex<HashSet<String>>,
    offline: Mutex<bool>,
    upserts: Mutex<Vec<String>>,
}

#[async_trait]
impl RemoteStore for FlakyStore {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn upsert_document(&self, collection: &str, key: &str, fields: Fields) -> Result<()> {
        self.upserts.lock().push(key.to_string());
        if *self.offline.lock() || self.failing_keys.lock().contains(key) {
            return Err(SyncError::transport("write rejected"));
        }
        self.inner.upsert_document(collection, key, fields).await
    }

    async fn get_all_documents(&self, collection: &str) -> Result<Vec<Fields>> {
        if *self.offline.lock() {
            return Err(SyncError::transport("offline"));
        }
        self.inner.get_all_documents(collection).await
    }

    async fn delete_document(&self, collection: &str, key: &str) -> Result<()> {
        if *self.offline.lock() {
            return Err(SyncError::transport("offline"));
        }
        self.inner.delete_document(collection, key).await
    }
}

fn records(taps: &[(f64, f64)], color: PaintColor) -> Vec<PaintedCellRecord> {
    let grid = GridIndex::new(BoundingRegion::JAPAN, GridDimensions::default()).unwrap();
    taps.iter()
        .map(|&(lat, lon)| {
            let cell = grid
                .resolve_cell(&GeoCoordinate::new(lat, lon).unwrap())
                .unwrap();
            PaintedCellRecord::new(&cell, color)
        })
        .collect()
}

#[tokio::test]
async fn test_persist_then_fetch() {
    let store = Arc::new(MemoryStore::new());
    let gateway = SyncGateway::new(store.clone(), DEFAULT_COLLECTION);
    let painted = records(&[(35.681236, 139.767125), (43.06, 141.35)], PaintColor::Red);

    let report = gateway.persist(&painted).await;
    assert!(report.is_clean());
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(store.len(DEFAULT_COLLECTION), 2);

    let mut fetched = gateway.fetch_all().await.unwrap();
    fetched.sort_by(|a, b| a.id.cmp(&b.id));
    let mut expected = painted.clone();
    expected.sort_by(|a, b| a.id.cmp(&b.id));

    for (got, want) in fetched.iter().zip(expected.iter()) {
        assert_eq!(got.id, want.id);
        assert_eq!(got.corners, want.corners);
        assert_eq!(got.color, PaintColor::Red);
        assert!(got.written_at.is_some());
    }
}

#[tokio::test]
async fn test_repaint_overwrites_document() {
    let store = Arc::new(MemoryStore::new());
    let gateway = SyncGateway::new(store.clone(), DEFAULT_COLLECTION);

    gateway
        .persist(&records(&[(35.0, 139.0)], PaintColor::Red))
        .await;
    gateway
        .persist(&records(&[(35.0, 139.0)], PaintColor::Mint))
        .await;

    let fetched = gateway.fetch_all().await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].color, PaintColor::Mint);
}

#[tokio::test]
async fn test_empty_persist_is_a_no_op() {
    let store = Arc::new(FlakyStore::default());
    let gateway = SyncGateway::new(store.clone(), DEFAULT_COLLECTION);

    let report = gateway.persist(&[]).await;
    assert_eq!(report.attempted(), 0);
    assert!(store.upserts.lock().is_empty());
}

#[tokio::test]
async fn test_failed_write_does_not_block_others() {
    let store = Arc::new(FlakyStore::default());
    let gateway = SyncGateway::new(store.clone(), DEFAULT_COLLECTION);
    let painted = records(
        &[(35.0, 139.0), (40.0, 141.0), (26.2, 127.7)],
        PaintColor::Blue,
    );
    store
        .failing_keys
        .lock()
        .insert(painted[1].id.to_string());

    let report = gateway.persist(&painted).await;

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, painted[1].id);
    assert!(matches!(report.failed[0].1, SyncError::Transport { .. }));
    assert_eq!(store.inner.len(DEFAULT_COLLECTION), 2);
}

#[tokio::test]
async fn test_fetch_skips_malformed_documents() {
    let store = Arc::new(MemoryStore::new());
    let gateway = SyncGateway::new(store.clone(), DEFAULT_COLLECTION);
    gateway
        .persist(&records(&[(35.0, 139.0)], PaintColor::Green))
        .await;

    store.insert_raw(
        DEFAULT_COLLECTION,
        "broken",
        json!({
            "coordinates": [
                { "latitude": 35.0, "longitude": 139.0 },
                { "latitude": 35.3 }
            ],
            "color": "Red"
        })
        .as_object()
        .cloned()
        .unwrap(),
    );
    store.insert_raw(DEFAULT_COLLECTION, "empty", Fields::new());

    let fetched = gateway.fetch_all().await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].color, PaintColor::Green);
}

#[tokio::test]
async fn test_fetch_reports_transport_error() {
    let store = Arc::new(FlakyStore::default());
    *store.offline.lock() = true;
    let gateway = SyncGateway::new(store, DEFAULT_COLLECTION);

    let err = gateway.fetch_all().await.unwrap_err();
    assert_eq!(err, SyncError::transport("offline"));
}

#[tokio::test]
async fn test_retract_removes_documents() {
    let store = Arc::new(MemoryStore::new());
    let gateway = SyncGateway::new(store.clone(), DEFAULT_COLLECTION);
    let painted = records(&[(35.0, 139.0), (40.0, 141.0)], PaintColor::Green);
    gateway.persist(&painted).await;

    let report = gateway.retract(&[painted[0].id.clone()]).await;
    assert!(report.is_clean());
    assert_eq!(store.keys(DEFAULT_COLLECTION), vec![painted[1].id.to_string()]);
}

#[tokio::test]
async fn test_retract_failure_is_reported() {
    let store = Arc::new(FlakyStore::default());
    *store.offline.lock() = true;
    let gateway = SyncGateway::new(store, DEFAULT_COLLECTION);
    let painted = records(&[(35.0, 139.0)], PaintColor::Green);

    let report = gateway.retract(&[painted[0].id.clone()]).await;
    assert_eq!(report.failed.len(), 1);
    assert!(report.succeeded.is_empty());
}
