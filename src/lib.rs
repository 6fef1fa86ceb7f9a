//! queryview library - request lifecycle and query-state rendering
//!
//! Exposes the query core (executors, renderers, error classification) and
//! the terminal front end built on it.

pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod notification;
pub mod query;
pub mod scroll;
pub mod theme;

#[cfg(test)]
pub mod test_utils;
pub mod widgets;

// Re-export commonly used types for convenience
pub use app::App;
pub use config::Config;
pub use query::{QueryBatchData, QueryData, QueryScope, RequestExecutor};
