use crate::common::{create_test_config, detail_page, mount_listing, mount_object};
use met_harvest::fetcher::Orchestrator;
use met_harvest::output::read_results;
use met_harvest::HarvestError;
use serde_json::json;
use std::collections::HashSet;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_run_skips_failed_items() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("objects.json");

    mount_listing(&server, &[10, 11, 12, 13, 14]).await;
    mount_object(&server, 10, detail_page(Some("/gallery/1"), Some("First"))).await;
    mount_object(&server, 11, detail_page(None, Some("Second"))).await;
    mount_object(&server, 13, detail_page(Some("/gallery/3"), None)).await;
    mount_object(&server, 14, detail_page(None, Some("Fifth"))).await;
    Mock::given(method("GET"))
        .and(path("/objects/12"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = create_test_config(&server, &results_path);
    let summary = Orchestrator::new(config).run().await.expect("run succeeds");

    assert_eq!(summary.fetched(), 3);
    assert_eq!(summary.stats.discovered, 5);
    assert_eq!(summary.stats.attempted, 5);
    assert_eq!(summary.stats.dropped_for("metadata_failed"), 1);
    assert_eq!(summary.stats.dropped_for("missing_description"), 1);
    assert_eq!(summary.stats.batches, 3);
    assert_eq!(summary.stats.pauses, 2);

    let records = read_results(&results_path).expect("results file");
    let ids: HashSet<_> = records.iter().filter_map(|r| r.object_id()).collect();
    assert_eq!(ids, HashSet::from([10, 11, 14]));

    let first = records.iter().find(|r| r.object_id() == Some(10)).unwrap();
    assert_eq!(first.gallery_link, "/gallery/1");
    assert_eq!(first.item_description, "First");
}

#[tokio::test]
async fn test_discovery_failure_aborts_without_output() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("objects.json");

    Mock::given(method("GET"))
        .and(path("/objects"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/objects/\d+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &results_path);
    let error = Orchestrator::new(config).run().await.unwrap_err();

    assert!(matches!(error, HarvestError::Discovery { .. }));
    assert_eq!(error.exit_code(), 2);
    assert!(!results_path.exists());
}

#[tokio::test]
async fn test_unreachable_listing_aborts_without_output() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("objects.json");

    let mut config = create_test_config(&server, &results_path);
    config.api.base_url = "http://127.0.0.1:1/".to_string();
    let error = Orchestrator::new(config).run().await.unwrap_err();

    assert!(matches!(error, HarvestError::Discovery { .. }));
    assert_eq!(error.exit_code(), 2);
    assert!(!results_path.exists());
}

#[tokio::test]
async fn test_listing_without_ids_field_is_discovery_failure() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("objects.json");

    Mock::given(method("GET"))
        .and(path("/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0})))
        .mount(&server)
        .await;

    let config = create_test_config(&server, &results_path);
    let error = Orchestrator::new(config).run().await.unwrap_err();

    assert!(matches!(error, HarvestError::Discovery { .. }));
    assert!(!results_path.exists());
}

#[tokio::test]
async fn test_null_id_list_writes_empty_collection() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("objects.json");

    Mock::given(method("GET"))
        .and(path("/objects"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"total": 0, "objectIDs": null})),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server, &results_path);
    let summary = Orchestrator::new(config).run().await.expect("run succeeds");

    assert_eq!(summary.fetched(), 0);
    assert_eq!(summary.stats.batches, 0);
    assert_eq!(summary.stats.pauses, 0);
    assert!(read_results(&results_path).unwrap().is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_department_filter_and_limit() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("objects.json");

    Mock::given(method("GET"))
        .and(path("/objects"))
        .and(query_param("departmentIds", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 3,
            "objectIDs": [1, 2, 3],
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_object(&server, 1, detail_page(None, Some("One"))).await;
    mount_object(&server, 2, detail_page(None, Some("Two"))).await;
    Mock::given(method("GET"))
        .and(path("/objects/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, &results_path);
    config.api.department_ids = vec![11];
    let summary = Orchestrator::new(config)
        .with_limit(Some(2))
        .run()
        .await
        .expect("run succeeds");

    assert_eq!(summary.stats.discovered, 3);
    assert_eq!(summary.stats.attempted, 2);
    assert_eq!(summary.fetched(), 2);
}

#[tokio::test]
async fn test_rerun_overwrites_results() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let results_path = dir.path().join("objects.json");
    std::fs::write(&results_path, "[{\"stale\": true}]").unwrap();

    mount_listing(&server, &[21]).await;
    mount_object(&server, 21, detail_page(None, Some("Fresh"))).await;

    let config = create_test_config(&server, &results_path);
    Orchestrator::new(config).run().await.expect("run succeeds");

    let records = read_results(&results_path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].item_description, "Fresh");
}
