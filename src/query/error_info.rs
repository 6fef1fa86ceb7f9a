//! Normalized error shape
//!
//! Backend failures arrive with loosely structured bodies (`{code, message}`,
//! lists of messages, transport codes). They are normalized once, at the
//! executor boundary, into an [`ErrorInfo`] carrying a closed [`ErrorKind`].
//! Everything downstream pattern-matches on the kind.

use std::fmt;

use serde_json::Value;

use super::operation::TransportError;

/// Error codes recognised by the classifier and the toast policy
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ACCESS_DENIED: &str = "ACCESS_DENIED";
    pub const CALCULATE_NOT_VALID: &str = "CALCULATE_NOT_VALID";
    pub const CONFIDENCE_CALCULATION_NOT_VALID: &str = "CONFIDENCE_CALCULATION_NOT_VALID";
    pub const DEPRECATED: &str = "DEPRECATED";
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    pub const CANCELED: &str = "CANCELED";
    pub const ERR_CANCELED: &str = "ERR_CANCELED";
}

/// Which authorization failure the backend reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDenial {
    NotFound,
    AccessDenied,
}

/// Which computed value the backend reported as stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleComputation {
    /// `CALCULATE_NOT_VALID`
    Maturity,
    /// `CONFIDENCE_CALCULATION_NOT_VALID`
    Confidence,
}

/// Canonical category of a normalized failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No backend code at all: the request never produced a classified answer
    Transport,
    AuthDenied(AuthDenial),
    StaleCompute(StaleComputation),
    /// A backend code this layer does not distinguish
    Unknown,
}

impl ErrorKind {
    /// Derive the kind from a normalized error code
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            None => ErrorKind::Transport,
            Some(codes::NOT_FOUND) => ErrorKind::AuthDenied(AuthDenial::NotFound),
            Some(codes::ACCESS_DENIED) => ErrorKind::AuthDenied(AuthDenial::AccessDenied),
            Some(codes::CALCULATE_NOT_VALID) => {
                ErrorKind::StaleCompute(StaleComputation::Maturity)
            }
            Some(codes::CONFIDENCE_CALCULATION_NOT_VALID) => {
                ErrorKind::StaleCompute(StaleComputation::Confidence)
            }
            Some(_) => ErrorKind::Unknown,
        }
    }
}

/// Error message as sent by the backend: a single string or a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    Single(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    /// First line of the message, if any
    pub fn first(&self) -> Option<&str> {
        match self {
            ErrorMessage::Single(s) => Some(s.as_str()),
            ErrorMessage::Many(list) => list.first().map(String::as_str),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(ErrorMessage::Single(s.clone())),
            Value::Array(items) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(ErrorMessage::Many(messages))
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessage::Single(s) => write!(f, "{}", s),
            ErrorMessage::Many(list) => write!(f, "{}", list.join("; ")),
        }
    }
}

/// Normalized failure of one request
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub code: Option<String>,
    /// Code reported by the transport itself (`ERR_BAD_RESPONSE`, ...)
    pub transport_code: Option<String>,
    pub http_status: Option<u16>,
    pub message: Option<ErrorMessage>,
    pub kind: ErrorKind,
    /// Raw response body, kept for the toast policy
    pub body: Option<Value>,
}

impl ErrorInfo {
    /// Normalize a transport failure
    ///
    /// The backend's `body.code` wins over the transport code; `body.message`
    /// wins over the transport message.
    pub fn normalize(err: &TransportError) -> Self {
        let body_code = err
            .body
            .as_ref()
            .and_then(|b| b.get("code"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let code = body_code.or_else(|| err.code.clone());

        let message = err
            .body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(ErrorMessage::from_value)
            .or_else(|| err.message.clone().map(ErrorMessage::Single));

        Self {
            kind: ErrorKind::from_code(code.as_deref()),
            code,
            transport_code: err.code.clone(),
            http_status: err.status,
            message,
            body: err.body.clone(),
        }
    }

    /// Build an error carrying only a backend code
    pub fn with_code(code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            transport_code: None,
            http_status: None,
            message: None,
            kind: ErrorKind::from_code(Some(code)),
            body: None,
        }
    }

    /// Build a code-less error from a local failure (e.g. an undecodable body)
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            transport_code: None,
            http_status: None,
            message: Some(ErrorMessage::Single(message.into())),
            kind: ErrorKind::Transport,
            body: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn is_auth_denied(&self) -> bool {
        matches!(self.kind, ErrorKind::AuthDenied(_))
    }

    pub fn is_stale_compute(&self) -> bool {
        matches!(self.kind, ErrorKind::StaleCompute(_))
    }

    /// True when the transport reported the request as cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.code.as_deref(),
            Some(codes::CANCELED) | Some(codes::ERR_CANCELED)
        )
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{}: {}", code, message),
            (Some(code), None) => write!(f, "{}", code),
            (None, Some(message)) => write!(f, "{}", message),
            (None, None) => match self.http_status {
                Some(status) => write!(f, "request failed with status {}", status),
                None => write!(f, "request failed"),
            },
        }
    }
}

#[cfg(test)]
#[path = "error_info_tests.rs"]
mod error_info_tests;
