//! HTTP client session
//!
//! This module owns the pooled transport used for a whole run:
//! - Building the client with pool limits, timeouts and the user agent
//! - Building listing and per-object endpoint URLs
//! - Turning every response into a body or a classified [`FetchFailure`]
//!
//! The session is created at the start of a run and dropped when the run
//! returns, on success and on error alike; dropping the last handle to the
//! client closes its pooled connections.

use crate::config::{ApiConfig, HttpConfig, UserAgentConfig};
use crate::record::ObjectId;
use crate::state::FetchFailure;
use crate::HarvestError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// No retry policy is installed; a failed request is reported once and the
/// caller decides what to do with it.
///
/// # Example
///
/// ```no_run
/// use met_harvest::config::{HttpConfig, UserAgentConfig};
/// use met_harvest::fetcher::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    http: &HttpConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let builder = Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(http.request_timeout())
        .connect_timeout(http.connect_timeout())
        .pool_max_idle_per_host(http.max_idle_connections)
        .pool_idle_timeout(http.idle_timeout())
        .gzip(true)
        .brotli(true);

    // HTTP/2 is negotiated through ALPN on TLS connections; plain http stays on 1.1.
    let builder = if http.http2 {
        builder
    } else {
        builder.http1_only()
    };

    builder.build()
}

/// A run-scoped HTTP client
pub struct ClientSession {
    client: Client,
    requests_sent: AtomicU64,
}

impl ClientSession {
    /// Opens a session with a freshly built client
    pub fn open(http: &HttpConfig, user_agent: &UserAgentConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(http, user_agent).map_err(HarvestError::Client)?;
        tracing::debug!(
            "Opened HTTP session (connect timeout {:?}, request timeout {:?})",
            http.connect_timeout(),
            http.request_timeout()
        );

        Ok(Self {
            client,
            requests_sent: AtomicU64::new(0),
        })
    }

    /// Number of requests issued through this session so far
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.load(Ordering::Relaxed)
    }

    /// Fetches a URL and returns its body as text
    ///
    /// Any status other than 200 is a failure.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchFailure> {
        self.requests_sent.fetch_add(1, Ordering::Relaxed);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::from_reqwest(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchFailure::from_reqwest(&e))
    }

    /// Fetches a URL and decodes its body as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchFailure> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| FetchFailure::Decode(e.to_string()))
    }

    /// Ends the session explicitly
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        tracing::debug!(
            "Closing HTTP session after {} requests",
            self.requests_sent()
        );
    }
}

/// Endpoint URLs of the collection API
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    base: Url,
    department_ids: Vec<u32>,
}

impl ApiEndpoints {
    /// Resolves endpoints against the configured base URL
    ///
    /// A base without a trailing slash is treated as a directory so that
    /// `.../v1` and `.../v1/` resolve the same way.
    pub fn new(config: &ApiConfig) -> Result<Self, HarvestError> {
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            department_ids: config.department_ids.clone(),
        })
    }

    /// The id listing endpoint, with the department filter applied
    pub fn listing(&self) -> Result<Url, HarvestError> {
        let mut url = self.base.join("objects")?;
        if !self.department_ids.is_empty() {
            let ids = self
                .department_ids
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join("|");
            url.query_pairs_mut().append_pair("departmentIds", &ids);
        }
        Ok(url)
    }

    /// The metadata endpoint of one object
    pub fn object(&self, id: ObjectId) -> Result<Url, ::url::ParseError> {
        self.base.join(&format!("objects/{}", id))
    }
}
