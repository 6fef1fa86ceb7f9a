//! HTTP operations
//!
//! [`HttpOperation`] is an [`Operation`] backed by reqwest. GET requests send
//! their arguments as query parameters, other methods send them as a JSON
//! body. Non-2xx responses become a [`TransportError`] carrying the status
//! and the parsed body so the backend's `code` can be classified.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client, Method};
use serde_json::Value;

use crate::config::HttpConfig;
use crate::error::QueryviewError;
use crate::query::{Args, Operation, RequestConfig, Response, TransportError};

/// Transport code for a 4xx response
pub const ERR_BAD_REQUEST: &str = "ERR_BAD_REQUEST";
/// Transport code for a 5xx response
pub const ERR_BAD_RESPONSE: &str = "ERR_BAD_RESPONSE";
pub const ERR_NETWORK: &str = "ERR_NETWORK";
/// Transport code for a timed-out request
pub const ECONNABORTED: &str = "ECONNABORTED";

/// One endpoint called through reqwest
#[derive(Debug, Clone)]
pub struct HttpOperation {
    client: Client,
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl HttpOperation {
    pub fn new(client: Client, method: Method, url: impl Into<String>) -> Self {
        Self {
            client,
            method,
            url: url.into(),
            headers: Vec::new(),
            timeout: None,
        }
    }

    /// GET `target` resolved against the configured base URL
    pub fn get(client: Client, config: &HttpConfig, target: &str) -> Self {
        let mut op = Self::new(client, Method::GET, resolve_url(config.base_url.as_deref(), target));
        op.headers = config
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        op.timeout = config.timeout_secs.map(Duration::from_secs);
        op
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send(
        client: Client,
        method: Method,
        url: String,
        headers: Vec<(String, String)>,
        timeout: Option<Duration>,
        args: Option<Args>,
    ) -> Result<Response, TransportError> {
        let mut request = client.request(method.clone(), &url);
        if let Some(args) = args {
            if method == Method::GET {
                request = request.query(&query_pairs(&args));
            } else {
                request = request.json(&Value::Object(args));
            }
        }
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(from_reqwest)?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(from_reqwest)?;
        let data = parse_body(&bytes);

        if (200..300).contains(&status) {
            Ok(Response { status, data })
        } else {
            log::debug!("{} {} failed with status {}", method, url, status);
            Err(status_error(status, data))
        }
    }
}

impl Operation for HttpOperation {
    fn call(
        &self,
        args: Option<Args>,
        config: RequestConfig,
    ) -> BoxFuture<'static, Result<Response, TransportError>> {
        let client = self.client.clone();
        let method = self.method.clone();
        let url = self.url.clone();
        let mut headers = self.headers.clone();
        headers.extend(config.headers);
        let timeout = config.timeout.or(self.timeout);
        let cancel_token = config.cancel_token;

        async move {
            let Some(cancel_token) = cancel_token else {
                return Self::send(client, method, url, headers, timeout, args).await;
            };
            if cancel_token.is_cancelled() {
                return Err(TransportError::cancelled());
            }

            tokio::select! {
                biased;

                _ = cancel_token.cancelled() => {
                    log::debug!("Request to {} cancelled", url);
                    Err(TransportError::cancelled())
                }

                result = Self::send(client, method, url.clone(), headers, timeout, args) => result,
            }
        }
        .boxed()
    }
}

/// Join `target` onto `base` unless `target` is already absolute
pub fn resolve_url(base: Option<&str>, target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        return target.to_string();
    }
    match base {
        Some(base) if !base.is_empty() => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            target.trim_start_matches('/')
        ),
        _ => target.to_string(),
    }
}

/// Flatten arguments into query parameters; arrays repeat the key
pub fn query_pairs(args: &Args) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in args {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar_text(item)));
                }
            }
            other => pairs.push((key.clone(), scalar_text(other))),
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JSON when it parses, the raw text otherwise, null when empty
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Failure for a non-2xx status
pub fn status_error(status: u16, body: Value) -> TransportError {
    let code = if status >= 500 {
        ERR_BAD_RESPONSE
    } else {
        ERR_BAD_REQUEST
    };
    TransportError {
        code: Some(code.to_string()),
        ..TransportError::http(status, body)
    }
}

fn from_reqwest(err: reqwest::Error) -> TransportError {
    let code = if err.is_timeout() {
        ECONNABORTED
    } else {
        ERR_NETWORK
    };
    TransportError {
        status: err.status().map(|s| s.as_u16()),
        code: Some(code.to_string()),
        message: Some(err.to_string()),
        body: None,
    }
}

/// Client shared by every operation of a session
pub fn build_client(config: &HttpConfig) -> Result<Client, QueryviewError> {
    let mut builder = Client::builder().user_agent(concat!("queryview/", env!("CARGO_PKG_VERSION")));
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
