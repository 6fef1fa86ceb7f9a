//! Tests for render

use super::*;
use crate::query::error_info::codes;
use crate::query::executor::{ExecutorOptions, QueryScope};
use crate::test_utils::test_helpers::*;
use serde_json::json;

#[test]
fn test_default_empty_predicate() {
    assert!(is_data_empty(&json!([])));
    assert!(is_data_empty(&json!({})));
    assert!(is_data_empty(&json!({"results": []})));

    assert!(!is_data_empty(&json!({"a": 1})));
    assert!(!is_data_empty(&json!([1])));
    assert!(!is_data_empty(&json!({"results": [1]})));
    assert!(!is_data_empty(&json!("text")));
    assert!(!is_data_empty(&json!(0)));
}

#[test]
fn test_loading_wins() {
    let mut state = loaded(json!({"a": 1}));
    state.begin();
    assert_eq!(QueryData::new(&state).decide(), RenderDecision::Loading);
}

#[test]
fn test_error_is_classified() {
    let state = failed(codes::CALCULATE_NOT_VALID);
    assert_eq!(
        QueryData::new(&state).decide(),
        RenderDecision::Error(ErrorView::Recalculating)
    );

    let state = failed(codes::NOT_FOUND);
    assert_eq!(
        QueryData::new(&state).decide(),
        RenderDecision::Error(ErrorView::NotFoundOrAccessDenied)
    );
}

#[test]
fn test_error_without_object_is_generic() {
    let mut state: RequestState<Value> = RequestState::new(None, true);
    state.fail_missing(None);
    assert_eq!(
        QueryData::new(&state).decide(),
        RenderDecision::Error(ErrorView::Generic)
    );
}

#[test]
fn test_custom_error_classifier() {
    let state = failed("SERVER_ERROR");
    let decision = QueryData::new(&state)
        .render_error(|_| ErrorView::Recalculating)
        .decide();
    assert_eq!(decision, RenderDecision::Error(ErrorView::Recalculating));
}

#[test]
fn test_empty_requires_show_empty_error() {
    let state = loaded(json!({"results": []}));

    assert_eq!(
        QueryData::new(&state).decide(),
        RenderDecision::Content(&json!({"results": []}))
    );
    assert_eq!(
        QueryData::new(&state).show_empty_error(true).decide(),
        RenderDecision::Empty
    );
}

#[test]
fn test_custom_empty_predicate() {
    let state = loaded(json!({"total": 0}));
    let decision = QueryData::new(&state)
        .show_empty_error(true)
        .is_data_empty(|data| data["total"] == json!(0))
        .decide();
    assert_eq!(decision, RenderDecision::Empty);
}

#[test]
fn test_idle_without_data_renders_nothing() {
    let state: RequestState<Value> = RequestState::default();
    assert_eq!(QueryData::new(&state).decide(), RenderDecision::Nothing);
}

#[test]
fn test_render_receives_data_through_context() {
    let state = loaded(json!({"title": "Space"}));

    let decision = QueryData::new(&state).render(|ctx| {
        assert!(ctx.state.loaded);
        assert!(ctx.error_object().is_none());
        assert!(ctx.executor().is_none());
        ctx.data["title"].as_str().unwrap_or_default().to_string()
    });

    assert_eq!(decision, RenderDecision::Content("Space".to_string()));
}

#[test]
fn test_render_not_called_outside_content() {
    let state = loading();
    let mut called = false;
    let decision = QueryData::new(&state).render(|_| called = true);
    assert_eq!(decision, RenderDecision::Loading);
    assert!(!called);
}

#[test]
fn test_context_outside_content_is_usage_error() {
    let state = failed(codes::ACCESS_DENIED);
    let result = QueryData::new(&state).context();
    assert!(matches!(result, Err(QueryError::ContextOutsideContent)));

    let state = loaded(json!([]));
    let result = QueryData::new(&state).show_empty_error(true).context();
    assert!(matches!(result, Err(QueryError::ContextOutsideContent)));
}

#[test]
fn test_decision_helpers() {
    let decision: RenderDecision<u8> = RenderDecision::Content(2);
    assert!(decision.is_content());
    assert_eq!(decision.clone().map(|n| n * 2), RenderDecision::Content(4));
    assert_eq!(decision.content(), Some(2));
    assert_eq!(RenderDecision::<u8>::Empty.content(), None);
}

#[test]
fn test_typed_collections_use_their_own_emptiness() {
    let state: RequestState<Vec<u8>> = RequestState::settled(Vec::new());
    assert_eq!(
        QueryData::new(&state).show_empty_error(true).decide(),
        RenderDecision::Empty
    );
}

#[derive(Debug, Clone, PartialEq)]
struct Report {
    rows: u32,
}

#[test]
fn test_plain_struct_with_own_empty_check() {
    let empty = RequestState::settled(Report { rows: 0 });
    let full = RequestState::settled(Report { rows: 3 });

    let decide = |state: &RequestState<Report>| {
        QueryData::with_empty_check(state, |r: &Report| r.rows == 0)
            .show_empty_error(true)
            .decide()
            .map(|r| r.rows)
    };

    assert_eq!(decide(&empty), RenderDecision::Empty);
    assert_eq!(decide(&full), RenderDecision::Content(3));
}

#[tokio::test]
async fn test_context_exposes_executor_for_requery() {
    let scope = QueryScope::current().unwrap();
    let executor = scope.executor(
        ok_op(json!({"n": 1})),
        ExecutorOptions::<Value>::default().run_on_mount(false),
    );
    executor.refetch().await.unwrap();
    let state = executor.snapshot();

    let view = QueryData::new(&state).with_executor(&executor);
    let ctx = view.context().unwrap();

    assert_eq!(ctx.data, &json!({"n": 1}));
    assert!(ctx.cancel_token().is_some());
    let requery = ctx.executor().map(|e| e.refetch());
    assert!(requery.is_some());
    if let Some(requery) = requery {
        assert_eq!(requery.await, Ok(json!({"n": 1})));
    }
}
