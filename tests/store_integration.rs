//! Integration tests for the gallery store against file-backed databases.

use std::path::PathBuf;
use std::sync::Arc;

use gallery_core::{
    AssetId, AssetKind, CompletionRecorder, Database, DatabaseOptions, GalleryStore,
    NewDownloadedAsset, PendingDownload, StoreDbErrorKind,
};
use tempfile::TempDir;
use tokio::task::JoinSet;

fn pending(id: usize, kind: AssetKind) -> PendingDownload {
    PendingDownload {
        asset_id: AssetId::from(id.to_string()),
        source: "aether_gazer",
        kind,
        url: format!("https://cdn.example.com/{id}.jpg"),
        file_name: format!("wall_{id}"),
        dest_dir: PathBuf::from("/tmp"),
    }
}

#[tokio::test]
async fn test_concurrent_recorders_share_one_database() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new_with_options(
        &temp_dir.path().join("gallery.db"),
        &DatabaseOptions {
            max_connections: 4,
            busy_timeout_ms: 5000,
        },
    )
    .await
    .unwrap();
    let store = GalleryStore::new(db);
    let recorder: Arc<dyn CompletionRecorder> = Arc::new(store.clone());

    let mut tasks = JoinSet::new();
    for worker in 0..8 {
        let recorder = Arc::clone(&recorder);
        tasks.spawn(async move {
            for i in 0..10 {
                let item = pending(worker * 10 + i, AssetKind::Desktop);
                recorder.record(&item, "wall.jpg").await.unwrap();
            }
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap();
    }

    assert_eq!(store.count_by_source("aether_gazer").await.unwrap(), 80);
    assert_eq!(store.existing_ids("aether_gazer").await.unwrap().len(), 80);
}

#[tokio::test]
async fn test_recorder_duplicate_triple_is_constraint_violation() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("gallery.db"))
        .await
        .unwrap();
    let store = GalleryStore::new(db);

    let desktop = pending(1, AssetKind::Desktop);
    let mobile = pending(1, AssetKind::Mobile);
    store.record(&desktop, "1_content.jpg").await.unwrap();
    store.record(&mobile, "1_mobile.jpg").await.unwrap();

    let error = store.record(&desktop, "1_content.jpg").await.unwrap_err();

    assert_eq!(error.kind(), StoreDbErrorKind::ConstraintViolation);
    assert!(error.to_string().contains("constraint_violation"));
    assert_eq!(store.count_by_source("aether_gazer").await.unwrap(), 2);
}

#[tokio::test]
async fn test_same_id_in_different_games_is_allowed() {
    let store = GalleryStore::new(Database::new_in_memory().await.unwrap());

    for game in ["azur_lane", "mahjong_soul"] {
        store
            .insert(&NewDownloadedAsset {
                id_gallery: "10",
                game,
                kind: AssetKind::Wallpaper,
                file_name: "w.jpg",
                url: "https://cdn.example.com/w.jpg",
            })
            .await
            .unwrap();
    }

    assert!(
        store
            .existing_ids("azur_lane")
            .await
            .unwrap()
            .contains(&AssetId::from(10_i64))
    );
    assert_eq!(store.count_by_source("mahjong_soul").await.unwrap(), 1);
    assert_eq!(store.count_by_source("arknights").await.unwrap(), 0);
}

#[tokio::test]
async fn test_rows_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("gallery.db");

    let db = Database::new(&db_path).await.unwrap();
    GalleryStore::new(db.clone())
        .record(&pending(5, AssetKind::Mobile), "5_mobile.png")
        .await
        .unwrap();
    db.close().await;

    let store = GalleryStore::new(Database::new(&db_path).await.unwrap());
    let rows = store.list_by_source("aether_gazer").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].asset_kind(), Some(AssetKind::Mobile));
    assert_eq!(rows[0].url, "https://cdn.example.com/5.jpg");
}
