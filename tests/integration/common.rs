use met_harvest::config::{
    ApiConfig, Config, FetcherConfig, HttpConfig, OutputConfig, UserAgentConfig,
};
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
pub fn create_test_config(server: &MockServer, results_path: &Path) -> Config {
    Config {
        api: ApiConfig {
            base_url: format!("{}/", server.uri()),
            department_ids: vec![],
        },
        fetcher: FetcherConfig {
            max_concurrent_requests: 5,
            batch_size: 2,
            batch_delay_secs: 0,
        },
        http: HttpConfig {
            connect_timeout_secs: 1,
            request_timeout_secs: 2,
            ..HttpConfig::default()
        },
        user_agent: UserAgentConfig::default(),
        output: OutputConfig {
            results_path: results_path.display().to_string(),
            ..OutputConfig::default()
        },
    }
}

/// Detail page HTML with the given gallery link and description paragraph
pub fn detail_page(gallery: Option<&str>, description: Option<&str>) -> String {
    let gallery = gallery
        .map(|href| {
            format!(
                r#"<span class="artwork__location--gallery">On view in <a href="{}">Gallery</a></span>"#,
                href
            )
        })
        .unwrap_or_default();
    let description = description
        .map(|text| {
            format!(
                r#"<div class="artwork__intro__desc js-artwork__intro__desc"><p>{}</p></div>"#,
                text
            )
        })
        .unwrap_or_default();

    format!(
        "<html><head><title>Object</title></head><body>{}{}</body></html>",
        gallery, description
    )
}

/// Mounts a metadata response whose objectURL points at a detail page on the same server
pub async fn mount_object(server: &MockServer, id: u64, page_html: String) {
    Mock::given(method("GET"))
        .and(path(format!("/objects/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectID": id,
            "title": format!("Object {}", id),
            "objectURL": format!("{}/art/{}", server.uri(), id),
            "isPublicDomain": true,
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/art/{}", id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page_html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts the id listing
pub async fn mount_listing(server: &MockServer, ids: &[u64]) {
    Mock::given(method("GET"))
        .and(path("/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": ids.len(),
            "objectIDs": ids,
        })))
        .mount(server)
        .await;
}
