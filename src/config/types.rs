use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Met-Harvest
///
/// Every section and every key is optional in the TOML file; missing values
/// fall back to the defaults the fetcher is tuned for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub fetcher: FetcherConfig,
    pub http: HttpConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Upstream collection API location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the collection API, ending in a slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Department filter for the listing call (empty means no filter)
    #[serde(rename = "department-ids")]
    pub department_ids: Vec<u32>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://collectionapi.metmuseum.org/public/collection/v1/".to_string(),
            department_ids: vec![11],
        }
    }
}

/// Batching and concurrency policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Maximum number of simultaneous in-flight item fetches
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,

    /// Number of ids per batch
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Pause between consecutive batches (seconds)
    #[serde(rename = "batch-delay-secs")]
    pub batch_delay_secs: u64,
}

impl FetcherConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_secs(self.batch_delay_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 10,
            batch_size: 25,
            batch_delay_secs: 60,
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Total per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Maximum idle keep-alive connections kept per host
    #[serde(rename = "max-idle-connections")]
    pub max_idle_connections: usize,

    /// How long an idle pooled connection is kept (seconds)
    #[serde(rename = "idle-timeout-secs")]
    pub idle_timeout_secs: u64,

    /// Negotiate HTTP/2 over TLS when the server offers it
    pub http2: bool,
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_idle_connections: 100,
            idle_timeout_secs: 90,
            http2: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub name: String,
    pub version: String,
}

impl UserAgentConfig {
    /// Header value in `Name/Version` form
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "MuseumFetcher".to_string(),
            version: "1.0".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON results document
    #[serde(rename = "results-path")]
    pub results_path: String,

    /// Path of the log file
    #[serde(rename = "log-path")]
    pub log_path: String,

    /// Log file rotation policy
    #[serde(rename = "log-rotation")]
    pub log_rotation: LogRotation,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "met_museum_objects.json".to_string(),
            log_path: "museum_fetcher.log".to_string(),
            log_rotation: LogRotation::Never,
        }
    }
}

/// How the log file is rolled over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Append to a single file forever
    #[default]
    Never,
    Hourly,
    Daily,
}
