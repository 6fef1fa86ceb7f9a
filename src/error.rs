use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryviewError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
