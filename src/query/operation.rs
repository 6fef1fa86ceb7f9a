//! Operation contract
//!
//! An operation is one backend call: it receives optional JSON arguments and
//! a [`RequestConfig`], and resolves to a [`Response`] or a [`TransportError`].
//! Any `Fn(Option<Args>, RequestConfig) -> Future` closure is an operation.

use std::future::Future;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::error_info::codes;

/// Arguments passed to an operation (a JSON object)
pub type Args = Map<String, Value>;

/// Per-request transport settings
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Token the operation must honour; filled by the executor when absent
    pub cancel_token: Option<CancellationToken>,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Successful response envelope
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub data: Value,
}

impl Response {
    /// 200 response carrying `data`
    pub fn ok(data: Value) -> Self {
        Self { status: 200, data }
    }
}

/// Failure surfaced by the transport layer
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("{}", .message.as_deref().unwrap_or("request failed"))]
pub struct TransportError {
    pub status: Option<u16>,
    /// Transport-level code, e.g. `ERR_NETWORK`
    pub code: Option<String>,
    pub message: Option<String>,
    /// Parsed response body (`{code, message, ...}`)
    pub body: Option<Value>,
}

impl TransportError {
    pub fn cancelled() -> Self {
        Self {
            code: Some(codes::ERR_CANCELED.to_string()),
            message: Some("canceled".to_string()),
            ..Self::default()
        }
    }

    /// Failure with an HTTP status and a JSON body
    pub fn http(status: u16, body: Value) -> Self {
        Self {
            status: Some(status),
            message: Some(format!("Request failed with status code {}", status)),
            body: Some(body),
            ..Self::default()
        }
    }

    /// Failure whose body carries only a backend code
    pub fn with_backend_code(code: &str) -> Self {
        Self {
            body: Some(serde_json::json!({ "code": code })),
            ..Self::default()
        }
    }
}

/// One backend call
pub trait Operation: Send + Sync {
    fn call(
        &self,
        args: Option<Args>,
        config: RequestConfig,
    ) -> BoxFuture<'static, Result<Response, TransportError>>;
}

impl<F, Fut> Operation for F
where
    F: Fn(Option<Args>, RequestConfig) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, TransportError>> + Send + 'static,
{
    fn call(
        &self,
        args: Option<Args>,
        config: RequestConfig,
    ) -> BoxFuture<'static, Result<Response, TransportError>> {
        self(args, config).boxed()
    }
}
