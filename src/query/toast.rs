//! Failure toasts
//!
//! The executor never talks to a UI directly. When toasting is enabled it
//! asks [`toast_message`] whether a failure deserves a toast and hands the
//! text to an injected [`ErrorSink`].

use serde::Deserialize;
use serde_json::Value;

use super::error_info::{ErrorInfo, codes};

/// Fallback toast text
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Error,
    Warning,
    Info,
    Success,
}

/// Which failures are toasted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastOptions {
    pub variant: ToastVariant,
    /// HTTP statuses that never toast
    pub filter_by_status: Vec<u16>,
    /// Error codes that never toast
    pub filter_by_code: Vec<String>,
    /// Skip form-validation payloads (field errors rendered next to inputs)
    pub filter_if_has_data: bool,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            variant: ToastVariant::Error,
            filter_by_status: Vec::new(),
            filter_by_code: Vec::new(),
            filter_if_has_data: true,
        }
    }
}

/// Receives toasts from executors
pub trait ErrorSink: Send + Sync {
    fn toast(&self, variant: ToastVariant, message: &str);
}

/// A toast queued for the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub variant: ToastVariant,
    pub message: String,
}

impl ErrorSink for std::sync::mpsc::Sender<Toast> {
    fn toast(&self, variant: ToastVariant, message: &str) {
        // Receiver gone means the UI is shutting down
        let _ = self.send(Toast {
            variant,
            message: message.to_string(),
        });
    }
}

/// Body looks like field-level validation errors rather than a failure message
fn is_validation_payload(body: &Value) -> bool {
    match body {
        Value::Object(map) => {
            !map.is_empty()
                && !map.contains_key("message")
                && !map.contains_key("error")
                && !map.contains_key("detail")
                && map
                    .get("non_field_errors")
                    .is_some_and(|v| v.is_array())
        }
        _ => false,
    }
}

fn body_text(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if key == "non_field_errors" => {
            items.first().and_then(Value::as_str).map(str::to_string)
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Decide whether `err` is toasted, and with which text
///
/// Returns `None` when the failure is filtered out.
pub fn toast_message(err: &ErrorInfo, options: &ToastOptions) -> Option<String> {
    if let Some(status) = err.http_status
        && options.filter_by_status.contains(&status)
    {
        return None;
    }

    // Either the backend code or the transport code can be filtered
    let filtered = [err.code.as_deref(), err.transport_code.as_deref()]
        .into_iter()
        .flatten()
        .any(|code| options.filter_by_code.iter().any(|c| c == code));
    if filtered {
        return None;
    }

    if options.filter_if_has_data
        && let Some(body) = &err.body
        && is_validation_payload(body)
    {
        return None;
    }

    if err.http_status == Some(401) {
        return None;
    }
    match err.code.as_deref().or(err.transport_code.as_deref()) {
        None | Some(codes::INVALID_TOKEN) | Some(codes::CANCELED) | Some(codes::ERR_CANCELED) => {
            return None;
        }
        Some(_) => {}
    }

    let from_body = err.body.as_ref().and_then(|body| {
        ["error", "message", "detail", "non_field_errors"]
            .iter()
            .find_map(|key| body_text(body, key))
    });

    Some(
        from_body
            .or_else(|| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| SOMETHING_WENT_WRONG.to_string()),
    )
}

#[cfg(test)]
#[path = "toast_tests.rs"]
mod toast_tests;
