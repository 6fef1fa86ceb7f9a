//! Tests for error_info

use super::*;
use insta::assert_snapshot;
use serde_json::json;

#[test]
fn test_body_code_wins_over_transport_code() {
    let err = TransportError {
        status: Some(403),
        code: Some("ERR_BAD_REQUEST".to_string()),
        message: Some("Request failed with status code 403".to_string()),
        body: Some(json!({"code": "ACCESS_DENIED", "message": "No access"})),
    };

    let info = ErrorInfo::normalize(&err);

    assert_eq!(info.code.as_deref(), Some(codes::ACCESS_DENIED));
    assert_eq!(info.http_status, Some(403));
    assert_eq!(info.message, Some(ErrorMessage::Single("No access".to_string())));
    assert_eq!(info.kind, ErrorKind::AuthDenied(AuthDenial::AccessDenied));
}

#[test]
fn test_transport_code_used_without_body() {
    let err = TransportError {
        code: Some("ERR_NETWORK".to_string()),
        message: Some("Network Error".to_string()),
        ..TransportError::default()
    };

    let info = ErrorInfo::normalize(&err);

    assert_eq!(info.code.as_deref(), Some("ERR_NETWORK"));
    assert_eq!(info.kind, ErrorKind::Unknown);
    assert_eq!(info.message, Some(ErrorMessage::Single("Network Error".to_string())));
}

#[test]
fn test_no_code_is_transport_kind() {
    let info = ErrorInfo::normalize(&TransportError::default());
    assert_eq!(info.kind, ErrorKind::Transport);
    assert!(info.code.is_none());
}

#[test]
fn test_message_list_is_preserved() {
    let err = TransportError::http(400, json!({"code": "INVALID_INPUT", "message": ["a", "b"]}));

    let info = ErrorInfo::normalize(&err);

    assert_eq!(
        info.message,
        Some(ErrorMessage::Many(vec!["a".to_string(), "b".to_string()]))
    );
    assert_eq!(info.message.as_ref().and_then(ErrorMessage::first), Some("a"));
}

#[test]
fn test_stale_codes_map_to_stale_compute() {
    assert_eq!(
        ErrorInfo::with_code(codes::CALCULATE_NOT_VALID).kind,
        ErrorKind::StaleCompute(StaleComputation::Maturity)
    );
    assert_eq!(
        ErrorInfo::with_code(codes::CONFIDENCE_CALCULATION_NOT_VALID).kind,
        ErrorKind::StaleCompute(StaleComputation::Confidence)
    );
    assert!(ErrorInfo::with_code(codes::CALCULATE_NOT_VALID).is_stale_compute());
}

#[test]
fn test_not_found_is_auth_denied() {
    let info = ErrorInfo::with_code(codes::NOT_FOUND);
    assert!(info.is_auth_denied());
    assert_eq!(info.kind, ErrorKind::AuthDenied(AuthDenial::NotFound));
}

#[test]
fn test_cancelled_codes() {
    assert!(ErrorInfo::normalize(&TransportError::cancelled()).is_cancelled());
    assert!(ErrorInfo::with_code(codes::CANCELED).is_cancelled());
    assert!(!ErrorInfo::with_code(codes::NOT_FOUND).is_cancelled());
}

#[test]
fn test_display_formats() {
    let info = ErrorInfo::normalize(&TransportError::http(
        404,
        json!({"code": "NOT_FOUND", "message": "Space not found"}),
    ));
    assert_snapshot!(info.to_string(), @"NOT_FOUND: Space not found");

    assert_snapshot!(ErrorInfo::with_code("ACCESS_DENIED").to_string(), @"ACCESS_DENIED");

    let bare = ErrorInfo {
        code: None,
        transport_code: None,
        http_status: Some(502),
        message: None,
        kind: ErrorKind::Transport,
        body: None,
    };
    assert_snapshot!(bare.to_string(), @"request failed with status 502");
}
