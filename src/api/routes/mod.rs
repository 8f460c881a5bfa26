//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`webhook`] — Job submission
//! - [`jobs`] — Job status queries
//! - [`system`] — Health, queue statistics, OpenAPI

mod jobs;
mod system;
mod webhook;

// Re-export all handlers so `routes::function_name` continues to work
pub use jobs::*;
pub use system::*;
pub use webhook::*;
