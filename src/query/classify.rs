//! Error classification
//!
//! Maps normalized errors to the view a screen shows instead of its content.
//! All functions here are pure.

use super::error_info::{ErrorInfo, ErrorKind};

/// Error view selected for a failed request or aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorView {
    NotFoundOrAccessDenied,
    /// A computed value is stale and being recalculated
    Recalculating,
    Generic,
}

/// Classify a single (possibly absent) error
pub fn classify(err: Option<&ErrorInfo>) -> ErrorView {
    match err.map(|e| e.kind) {
        Some(ErrorKind::AuthDenied(_)) => ErrorView::NotFoundOrAccessDenied,
        Some(ErrorKind::StaleCompute(_)) => ErrorView::Recalculating,
        Some(ErrorKind::Transport) | Some(ErrorKind::Unknown) | None => ErrorView::Generic,
    }
}

/// Classify the per-member errors of an aggregate
///
/// A stale computation anywhere wins. Otherwise the last entry decides; when
/// the last member has no error, the first error carrying a code decides.
/// An earlier access-denied can therefore be hidden behind a later generic
/// failure (aggregates check for access-denied before calling this).
pub fn classify_list(errors: &[Option<&ErrorInfo>]) -> ErrorView {
    if errors.iter().flatten().any(|e| e.is_stale_compute()) {
        return ErrorView::Recalculating;
    }

    match errors.last() {
        None => ErrorView::Generic,
        Some(Some(last)) => classify(Some(last)),
        Some(None) => errors
            .iter()
            .flatten()
            .find(|e| e.code.is_some())
            .map_or(ErrorView::Generic, |e| classify(Some(e))),
    }
}

/// Whether the viewer may see the screen at all
///
/// False when any error is an authorization failure or carries HTTP 403/404.
pub fn has_view_permission(errors: &[Option<&ErrorInfo>]) -> bool {
    !errors
        .iter()
        .flatten()
        .any(|e| e.is_auth_denied() || matches!(e.http_status, Some(403) | Some(404)))
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod classify_tests;
