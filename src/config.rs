//! Configuration types
//!
//! Everything has a working default: `Config::default()` produces a server
//! that downloads with yt-dlp from PATH, persists its bearer token next to
//! the working directory, and binds the API to localhost.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Download mechanism settings (binary, destination template, timeout)
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Path of the persisted bearer token file (default: api_token.txt)
    ///
    /// Created on first run if absent; reused verbatim thereafter so the
    /// token stays stable across restarts.
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download: DownloadConfig::default(),
            api: ApiConfig::default(),
            token_file: default_token_file(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::Error::Config(format!(
                "could not read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| crate::Error::Config(format!("invalid configuration: {e}")))?;
        Ok(config)
    }
}

/// Download mechanism configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// External download command (default: yt-dlp, resolved via PATH)
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Output template handed to the download command via `-o`
    #[serde(default = "default_output_template")]
    pub output_template: String,

    /// Upper bound on a single download invocation, in seconds (default: 300)
    ///
    /// A job exceeding this is killed and recorded as failed with a
    /// timeout-specific message.
    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            output_template: default_output_template(),
            job_timeout_secs: default_job_timeout_secs(),
        }
    }
}

impl DownloadConfig {
    /// The job timeout as a [`Duration`]
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

fn default_token_file() -> PathBuf {
    PathBuf::from("api_token.txt")
}

fn default_binary() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_output_template() -> String {
    "/youtube/%(uploader)s/%(title)s.%(ext)s".to_string()
}

fn default_job_timeout_secs() -> u64 {
    300
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_true() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
