//! End-to-end pipeline runs against mock publisher endpoints.

mod support;

use gallery_core::pipeline::{self, PipelineError, RunOptions};
use gallery_core::{
    AetherGazer, Arknights, AssetKind, CompletionRecorder, Database, GalleryStore, MahjongSoul,
};
use support::socket_guard::start_mock_server_or_skip;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options(temp_dir: &TempDir) -> RunOptions {
    RunOptions {
        dest_path: Some(temp_dir.path().join("walls")),
        database_path: temp_dir.path().join("yostar-gallery.db"),
        ..RunOptions::default()
    }
}

async fn mount_json(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, route: &str, content_type: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", content_type)
                .set_body_bytes(b"image-bytes".to_vec()),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_aether_gazer_record_yields_two_kinds_and_second_run_is_noop() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();

    mount_json(
        &server,
        "/api/gallery/list",
        r#"{"code":200,"data":{"count":1,"rows":[
            {"id":42,"title":"Dawn Patrol","type":"wallpaper",
             "contentImg":"img/42_d","mobileContentImg1":"img/42_m.jpg",
             "stickerUrl":"","creator":"Studio"}
        ]},"msg":"success"}"#
            .to_string(),
    )
    .await;
    mount_image(&server, "/img/42_d", "image/png").await;
    mount_image(&server, "/img/42_m.jpg", "image/jpeg").await;

    let publisher = AetherGazer::with_urls(
        format!("{}/api/gallery/list", server.uri()),
        format!("{}/", server.uri()),
    );
    let options = options(&temp_dir);

    let first = pipeline::run(&publisher, &options).await.unwrap();

    assert_eq!(first.listed, 1);
    assert_eq!(first.pending, 2);
    assert_eq!(first.stats.downloaded, 2);
    assert_eq!(first.stats.failed, 0);
    let root = temp_dir.path().join("walls");
    assert!(root.join("contentImg/Dawn_Patrol_42_content.png").exists());
    assert!(root.join("mobileContentImg/Dawn_Patrol_42_mobile.jpg").exists());

    let second = pipeline::run(&publisher, &options).await.unwrap();

    assert_eq!(second.listed, 1);
    assert_eq!(second.pending, 0);
    assert_eq!(second.stats.enqueued, 0);
    assert_eq!(second.stats.downloaded, 0);

    let store = GalleryStore::new(Database::new(&options.database_path).await.unwrap());
    let rows = store.list_by_source("aether_gazer").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.id_gallery == "42"));
    let kinds: Vec<_> = rows.iter().filter_map(|row| row.asset_kind()).collect();
    assert!(kinds.contains(&AssetKind::Desktop));
    assert!(kinds.contains(&AssetKind::Mobile));
}

#[tokio::test]
async fn test_failed_variant_is_retried_on_next_run() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();

    mount_json(
        &server,
        "/api/gallery/list",
        r#"{"code":200,"data":{"count":1,"rows":[
            {"id":42,"title":"Dawn Patrol","type":"wallpaper",
             "contentImg":"img/42_d.png","mobileContentImg1":"img/42_m.jpg",
             "stickerUrl":"","creator":"Studio"}
        ]},"msg":"success"}"#
            .to_string(),
    )
    .await;
    mount_image(&server, "/img/42_d.png", "image/png").await;
    Mock::given(method("GET"))
        .and(path("/img/42_m.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_image(&server, "/img/42_m.jpg", "image/jpeg").await;

    let publisher = AetherGazer::with_urls(
        format!("{}/api/gallery/list", server.uri()),
        format!("{}/", server.uri()),
    );
    let options = options(&temp_dir);
    let mobile = temp_dir
        .path()
        .join("walls/mobileContentImg/Dawn_Patrol_42_mobile.jpg");

    let first = pipeline::run(&publisher, &options).await.unwrap();

    assert_eq!(first.pending, 2);
    assert_eq!(first.stats.downloaded, 1);
    assert_eq!(first.stats.failed, 1);
    assert!(!mobile.exists());

    let second = pipeline::run(&publisher, &options).await.unwrap();

    assert_eq!(second.pending, 1);
    assert_eq!(second.stats.downloaded, 1);
    assert_eq!(second.stats.failed, 0);
    assert!(mobile.exists());

    let store = GalleryStore::new(Database::new(&options.database_path).await.unwrap());
    let recorded = store.recorded_variants("aether_gazer").await.unwrap();
    assert_eq!(recorded.len(), 2);
    assert!(recorded.contains(&(gallery_core::AssetId::from(42_i64), AssetKind::Mobile)));
}

#[tokio::test]
async fn test_previously_recorded_ids_are_not_fetched() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();
    let options = options(&temp_dir);

    let seeded = Database::new(&options.database_path).await.unwrap();
    let item = gallery_core::PendingDownload {
        asset_id: gallery_core::AssetId::from("old"),
        source: "arknights",
        kind: AssetKind::Wallpaper,
        url: "https://cdn.example.com/old.png".to_string(),
        file_name: "old".to_string(),
        dest_dir: temp_dir.path().to_path_buf(),
    };
    GalleryStore::new(seeded.clone())
        .record(&item, "old.png")
        .await
        .unwrap();
    seeded.close().await;

    mount_json(
        &server,
        "/api/cms/fankit/queryFankit",
        r#"{"retcode":0,"data":{"pageCountNum":1,"fankitList":[
            {"_id":"old","title":"Old","artistName":"A","wallpaper":{"l":"f/old.png"}},
            {"_id":"new","title":"New","artistName":"B","wallpaper":{"l":"f/new.png"}}
        ]}}"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/f/old.png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_image(&server, "/f/new.png", "image/png").await;

    let publisher = Arknights::with_urls(
        format!("{}/api/cms/fankit/queryFankit", server.uri()),
        server.uri(),
    );
    let summary = pipeline::run(&publisher, &options).await.unwrap();

    assert_eq!(summary.listed, 2);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.stats.downloaded, 1);
    assert!(temp_dir.path().join("walls/New_(B).png").exists());
}

#[tokio::test]
async fn test_item_failures_do_not_fail_the_run() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();
    let options = options(&temp_dir);

    mount_json(
        &server,
        "/api/assets/wallpaper",
        format!(
            r#"{{"code":0,"data":{{"count":2,"rows":[
                {{"id":1,"pc":"{uri}/pc/1.jpg","title":"One"}},
                {{"id":2,"pc":"{uri}/pc/2.jpg","title":"Two"}}
            ]}},"msg":"ok"}}"#,
            uri = server.uri()
        ),
    )
    .await;
    mount_image(&server, "/pc/1.jpg", "image/jpeg").await;
    Mock::given(method("GET"))
        .and(path("/pc/2.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let publisher =
        MahjongSoul::with_listing_url(format!("{}/api/assets/wallpaper", server.uri()));
    let summary = pipeline::run(&publisher, &options).await.unwrap();

    assert_eq!(summary.stats.downloaded, 1);
    assert_eq!(summary.stats.failed, 1);

    let store = GalleryStore::new(Database::new(&options.database_path).await.unwrap());
    let ids = store.existing_ids("mahjong_soul").await.unwrap();
    assert_eq!(ids.len(), 1);
    assert!(ids.contains(&gallery_core::AssetId::from(1_i64)));
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let publisher = MahjongSoul::with_listing_url(format!("{}/list", server.uri()));
    let error = pipeline::run(&publisher, &options(&temp_dir))
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::Listing(_)));
}

#[tokio::test]
async fn test_invalid_pool_config_fails_before_any_request() {
    let temp_dir = TempDir::new().unwrap();
    let mut options = options(&temp_dir);
    options.pool.worker_count = 0;

    let publisher = MahjongSoul::with_listing_url("http://127.0.0.1:9/never");
    let error = pipeline::run(&publisher, &options).await.unwrap_err();

    assert!(matches!(error, PipelineError::Pool(_)));
    assert!(!temp_dir.path().join("walls").exists());
}
