use crate::common::{create_test_config, detail_page, mount_object};
use met_harvest::fetcher::{ApiEndpoints, ClientSession, ItemFetcher, MuseumItemFetcher};
use met_harvest::{DropReason, FetchFailure, ItemOutcome};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fetches one id against the mock server with a fresh session
async fn fetch_one(server: &MockServer, id: u64) -> ItemOutcome {
    let config = create_test_config(server, Path::new("unused.json"));
    let session = ClientSession::open(&config.http, &config.user_agent).expect("session");
    let endpoints = ApiEndpoints::new(&config.api).expect("endpoints");
    let fetcher = MuseumItemFetcher::new(&session, &endpoints);
    fetcher.fetch(id).await
}

#[tokio::test]
async fn test_enriches_record_with_both_fields() {
    let server = MockServer::start().await;
    mount_object(
        &server,
        45734,
        detail_page(Some("/art/collection/search?gallery=822"), Some("  A quail and millet.  ")),
    )
    .await;

    let record = fetch_one(&server, 45734)
        .await
        .into_record()
        .expect("record should be enriched");

    assert_eq!(record.object_id(), Some(45734));
    assert_eq!(record.item_description, "A quail and millet.");
    assert_eq!(record.gallery_link, "/art/collection/search?gallery=822");
    assert_eq!(record.metadata.get("title"), Some(&json!("Object 45734")));
}

#[tokio::test]
async fn test_missing_gallery_link_is_empty_string() {
    let server = MockServer::start().await;
    mount_object(&server, 1, detail_page(None, Some("Bowl with lotus decoration"))).await;

    let record = fetch_one(&server, 1).await.into_record().expect("record");

    assert_eq!(record.gallery_link, "");
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["galleryLink"], json!(""));
}

#[tokio::test]
async fn test_missing_description_drops_item_even_with_gallery_link() {
    let server = MockServer::start().await;
    mount_object(&server, 2, detail_page(Some("/gallery/301"), None)).await;

    let outcome = fetch_one(&server, 2).await;

    assert_eq!(outcome, ItemOutcome::Dropped(DropReason::MissingDescription));
}

#[tokio::test]
async fn test_metadata_404_drops_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/objects/3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let outcome = fetch_one(&server, 3).await;

    assert_eq!(
        outcome,
        ItemOutcome::Dropped(DropReason::MetadataFailed(FetchFailure::Status(404)))
    );
}

#[tokio::test]
async fn test_missing_object_url_skips_detail_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/objects/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectID": 4,
            "objectURL": "",
        })))
        .mount(&server)
        .await;

    let outcome = fetch_one(&server, 4).await;

    assert_eq!(outcome, ItemOutcome::Dropped(DropReason::MissingObjectUrl));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_detail_page_error_drops_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/objects/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectID": 5,
            "objectURL": format!("{}/art/5", server.uri()),
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/art/5"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = fetch_one(&server, 5).await;

    assert_eq!(
        outcome,
        ItemOutcome::Dropped(DropReason::DetailPageFailed(FetchFailure::Status(503)))
    );
}

#[tokio::test]
async fn test_unreachable_detail_page_is_connect_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/objects/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectID": 9,
            "objectURL": "http://127.0.0.1:1/art/9",
        })))
        .mount(&server)
        .await;

    let outcome = fetch_one(&server, 9).await;

    assert_eq!(
        outcome,
        ItemOutcome::Dropped(DropReason::DetailPageFailed(FetchFailure::Connect))
    );
}

#[tokio::test]
async fn test_invalid_metadata_json_is_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/objects/6"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let outcome = fetch_one(&server, 6).await;

    assert!(matches!(
        outcome,
        ItemOutcome::Dropped(DropReason::MetadataFailed(FetchFailure::Decode(_)))
    ));
}

#[tokio::test]
async fn test_slow_detail_page_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/objects/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectID": 7,
            "objectURL": format!("{}/art/7", server.uri()),
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/art/7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page(None, Some("Too late")))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let outcome = fetch_one(&server, 7).await;

    assert_eq!(
        outcome,
        ItemOutcome::Dropped(DropReason::DetailPageFailed(FetchFailure::Timeout))
    );
}

#[tokio::test]
async fn test_sends_identifying_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/objects/8"))
        .and(header("user-agent", "MuseumFetcher/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"objectID": 8})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = fetch_one(&server, 8).await;

    // The header matched, so the metadata was served and only objectURL is missing
    assert_eq!(outcome, ItemOutcome::Dropped(DropReason::MissingObjectUrl));
}
