//! Application state for the API server

use crate::WebhookDownloader;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned per request (a cheap Arc clone); every clone talks to the same
/// downloader instance.
#[derive(Clone)]
pub struct AppState {
    /// The main WebhookDownloader instance
    pub downloader: Arc<WebhookDownloader>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(downloader: Arc<WebhookDownloader>) -> Self {
        Self { downloader }
    }
}
