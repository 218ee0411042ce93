use serde::Deserialize;

/// Browser-like identification sent with every outbound request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Maximum number of anchors examined by the link health check
pub const MAX_LINK_SAMPLE: usize = 10;

/// Main configuration structure for pagemeta
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default, rename = "link-check")]
    pub link_check: LinkCheckConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Primary page fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Request timeout for the primary page fetch (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on the buffered response body
    #[serde(rename = "max-body-bytes", default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Broken-link sampling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LinkCheckConfig {
    /// Number of anchors examined, in document order
    #[serde(rename = "sample-size", default = "default_sample_size")]
    pub sample_size: usize,

    /// Number of probes in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-probe timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

/// REST API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(rename = "bind-addr", default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_max_body_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_sample_size() -> usize {
    MAX_LINK_SAMPLE
}

fn default_concurrency() -> usize {
    4
}

fn default_database_path() -> String {
    "./pagemeta.db".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for LinkCheckConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}
