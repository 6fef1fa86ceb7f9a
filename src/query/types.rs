//! Query error type

use thiserror::Error;

use super::error_info::ErrorInfo;

/// Error returned by executor queries and render-context lookups
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The operation failed; the normalized error is also stored in state
    #[error("{0}")]
    Transport(ErrorInfo),

    #[error("request cancelled")]
    Cancelled,

    /// The response (or its accessor projection) held no data
    #[error("response contained no data")]
    MissingData,

    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The owning scope was dropped; no state update was made
    #[error("query scope has been disposed")]
    Disposed,

    #[error("no tokio runtime is available to run queries")]
    NoRuntime,

    /// A render context was requested outside the content branch
    #[error("query context is only available while rendering content")]
    ContextOutsideContent,
}

impl QueryError {
    /// The normalized error, when the failure came from the operation
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            QueryError::Transport(info) => Some(info),
            _ => None,
        }
    }
}
