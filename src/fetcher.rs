//! External download mechanism
//!
//! The media download itself is an external collaborator: an opaque command
//! that takes a URL and a destination template and reports success or
//! failure plus textual output. [`MediaFetcher`] is the seam; the production
//! implementation shells out to yt-dlp, tests substitute scripted mocks.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::DownloadConfig;
use crate::error::Result;

/// Captured outcome of one download-command invocation
#[derive(Clone, Debug)]
pub struct FetchOutput {
    /// Whether the command exited with status zero
    pub success: bool,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// The external media-download mechanism
///
/// `fetch` returns `Err` only for invocation faults (the command could not
/// be run at all); an unsuccessful download is an `Ok` output with
/// `success == false`.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch `url` to the configured destination, capturing the outcome
    async fn fetch(&self, url: &str) -> Result<FetchOutput>;

    /// Short mechanism name, used in failure messages
    fn name(&self) -> &str;
}

/// yt-dlp-backed fetcher
///
/// Invokes `<binary> <url> -o <output_template>` and captures both output
/// streams. The child is killed if the invocation future is dropped, so a
/// timed-out download does not leave a stray process behind.
pub struct YtDlpFetcher {
    binary_path: PathBuf,
    output_template: String,
    name: String,
}

impl YtDlpFetcher {
    /// Create a fetcher with an explicit binary path
    pub fn new(binary_path: PathBuf, output_template: impl Into<String>) -> Self {
        let name = binary_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "yt-dlp".to_string());
        Self {
            binary_path,
            output_template: output_template.into(),
            name,
        }
    }

    /// Attempt to find the named binary in PATH
    pub fn from_path(binary: &str, output_template: impl Into<String>) -> Option<Self> {
        which::which(binary)
            .ok()
            .map(|path| Self::new(path, output_template))
    }

    /// Build a fetcher from the download configuration
    ///
    /// Bare command names are resolved via PATH when possible; unresolvable
    /// names are kept verbatim so the failure surfaces per-job as a fault
    /// rather than refusing to start the service.
    pub fn from_config(config: &DownloadConfig) -> Self {
        let binary_path =
            which::which(&config.binary).unwrap_or_else(|_| config.binary.clone());
        Self::new(binary_path, config.output_template.clone())
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput> {
        let output = Command::new(&self.binary_path)
            .arg(url)
            .arg("-o")
            .arg(&self.output_template)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(FetchOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
