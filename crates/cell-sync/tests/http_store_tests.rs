use mockito::Matcher;
use paint_grid_core::{Cell, GeoCoordinate, PaintColor, PaintedCellRecord};
use paint_grid_sync::{HttpStore, RemoteStore, SyncError, SyncGateway, DEFAULT_COLLECTION};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn sample_record() -> PaintedCellRecord {
    let c = |latitude, longitude| GeoCoordinate {
        latitude,
        longitude,
    };
    let cell = Cell::from_corners([
        c(35.5, 139.5),
        c(35.75, 139.5),
        c(35.75, 139.75),
        c(35.5, 139.75),
    ]);
    PaintedCellRecord::new(&cell, PaintColor::Purple)
}

fn store_for(server: &mockito::ServerGuard) -> Arc<HttpStore> {
    Arc::new(HttpStore::new(&server.url(), Duration::from_secs(5)).unwrap())
}

#[tokio::test]
async fn test_persist_puts_document() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/paintedCells/35.500000-139.500000")
        .match_body(Matcher::PartialJson(json!({
            "color": "Purple",
            "timestamp": { ".sv": "timestamp" },
            "coordinates": [
                { "latitude": 35.5, "longitude": 139.5 },
                { "latitude": 35.75, "longitude": 139.5 },
                { "latitude": 35.75, "longitude": 139.75 },
                { "latitude": 35.5, "longitude": 139.75 }
            ]
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let gateway = SyncGateway::new(store_for(&server), DEFAULT_COLLECTION);
    let report = gateway.persist(&[sample_record()]).await;

    assert!(report.is_clean());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_persist_reports_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let gateway = SyncGateway::new(store_for(&server), DEFAULT_COLLECTION);
    let report = gateway.persist(&[sample_record()]).await;

    assert_eq!(report.failed.len(), 1);
    assert!(matches!(report.failed[0].1, SyncError::Transport { .. }));
}

#[tokio::test]
async fn test_fetch_keyed_listing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/paintedCells")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "35.500000-139.500000": {
                    "coordinates": [
                        { "latitude": 35.5, "longitude": 139.5 },
                        { "latitude": 35.75, "longitude": 139.5 },
                        { "latitude": 35.75, "longitude": 139.75 },
                        { "latitude": 35.5, "longitude": 139.75 }
                    ],
                    "color": "Purple",
                    "timestamp": 1758880800000i64
                },
                "partial": { "color": "Red" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let gateway = SyncGateway::new(store_for(&server), DEFAULT_COLLECTION);
    let fetched = gateway.fetch_all().await.unwrap();

    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, sample_record().id);
    assert_eq!(fetched[0].color, PaintColor::Purple);
    assert_eq!(fetched[0].written_at.unwrap().timestamp(), 1_758_880_800);
}

#[tokio::test]
async fn test_fetch_empty_collection() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/paintedCells")
        .with_status(200)
        .with_body("null")
        .create_async()
        .await;

    let store = store_for(&server);
    assert!(store
        .get_all_documents(DEFAULT_COLLECTION)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_fetch_transport_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/paintedCells")
        .with_status(500)
        .create_async()
        .await;

    let gateway = SyncGateway::new(store_for(&server), DEFAULT_COLLECTION);
    assert!(matches!(
        gateway.fetch_all().await,
        Err(SyncError::Transport { .. })
    ));
}

#[tokio::test]
async fn test_delete_document() {
    let mut server = mockito::Server::new_async().await;
    let removed = server
        .mock("DELETE", "/paintedCells/35.500000-139.500000")
        .with_status(200)
        .create_async()
        .await;
    let missing = server
        .mock("DELETE", "/paintedCells/gone")
        .with_status(404)
        .create_async()
        .await;

    let store = store_for(&server);
    store
        .delete_document(DEFAULT_COLLECTION, "35.500000-139.500000")
        .await
        .unwrap();
    store
        .delete_document(DEFAULT_COLLECTION, "gone")
        .await
        .unwrap();

    removed.assert_async().await;
    missing.assert_async().await;
}
