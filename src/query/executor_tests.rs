//! Tests for executor

use super::*;
use crate::query::error_info::{AuthDenial, ErrorKind, codes};
use crate::query::operation::TransportError;
use crate::query::render::{QueryData, RenderDecision};
use crate::test_utils::test_helpers::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

async fn settle<T: Clone>(executor: &RequestExecutor<T>) -> RequestState<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let mut rx = executor.subscribe();
    rx.wait_for(|s| !s.loading)
        .await
        .expect("executor state dropped")
        .clone()
}

#[tokio::test]
async fn test_run_on_mount_with_accessor_settles_to_empty_list() {
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        ok_op(json!({"items": []})),
        ExecutorOptions::default().accessor("items"),
    );

    assert!(executor.snapshot().loading);
    let state = settle(&executor).await;

    assert_eq!(state.data, Some(json!([])));
    assert!(state.loaded);
    assert!(!state.loading);
    assert!(!state.error);

    let decision = QueryData::new(&state).show_empty_error(true).decide();
    assert_eq!(decision, RenderDecision::Empty);
}

#[tokio::test]
async fn test_idle_executor_does_not_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        echo_op(Arc::clone(&calls)),
        ExecutorOptions::default().run_on_mount(false),
    );

    tokio::task::yield_now().await;
    let state = executor.snapshot();
    assert!(!state.loading);
    assert!(!state.loaded);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_loading_between_start_and_settlement() {
    let gate = Arc::new(Semaphore::new(0));
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        gated_op(Arc::clone(&gate), json!({"a": 1})),
        ExecutorOptions::default().run_on_mount(false),
    );

    let handle = scope.spawn_query(&executor, None);
    assert!(executor.snapshot().loading);

    tokio::task::yield_now().await;
    assert!(executor.snapshot().loading);

    gate.add_permits(1);
    let result = handle.await.unwrap();

    assert_eq!(result, Ok(json!({"a": 1})));
    let state = executor.snapshot();
    assert!(!state.loading);
    assert!(state.loaded);
}

#[tokio::test]
async fn test_query_passes_arguments() {
    let calls = Arc::new(AtomicUsize::new(0));
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        echo_op(Arc::clone(&calls)),
        ExecutorOptions::default().run_on_mount(false),
    );

    let mut args = Args::new();
    args.insert("assessmentId".to_string(), json!("abc"));
    let data = executor
        .query(Some(args), RequestConfig::default())
        .await
        .unwrap();

    assert_eq!(data["args"]["assessmentId"], json!("abc"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_keeps_data_and_returns_error() {
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        scripted_op(vec![
            Ok(json!({"a": 1})),
            Err(backend_error(codes::ACCESS_DENIED)),
        ]),
        ExecutorOptions::default(),
    );
    settle(&executor).await;

    let result = executor.refetch().await;

    let err = result.unwrap_err();
    assert_eq!(
        err.error_info().and_then(|e| e.code.as_deref()),
        Some(codes::ACCESS_DENIED)
    );
    let state = executor.snapshot();
    assert!(state.error);
    assert!(!state.loading);
    assert!(!state.loaded);
    assert_eq!(state.data, Some(json!({"a": 1})));
    assert_eq!(
        state.error_object.map(|e| e.kind),
        Some(ErrorKind::AuthDenied(AuthDenial::AccessDenied))
    );
}

#[tokio::test]
async fn test_success_after_failure_clears_error_object() {
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        scripted_op(vec![Err(backend_error("SERVER_ERROR")), Ok(json!([1]))]),
        ExecutorOptions::default(),
    );
    let state = settle(&executor).await;
    assert!(state.error);

    executor.refetch().await.unwrap();

    let state = executor.snapshot();
    assert!(!state.error);
    assert!(state.error_object.is_none());
    assert!(state.loaded);
}

#[tokio::test]
async fn test_missing_accessor_path_uses_initial_data() {
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        ok_op(json!({"other": 1})),
        ExecutorOptions::default()
            .accessor("items")
            .initial_data(json!([])),
    );

    let state = settle(&executor).await;
    assert_eq!(state.data, Some(json!([])));
    assert!(state.loaded);
    assert!(!state.error);
}

#[tokio::test]
async fn test_null_response_marks_error_without_error_object() {
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        ok_op(Value::Null),
        ExecutorOptions::default().run_on_mount(false),
    );

    let result = executor.refetch().await;

    assert_eq!(result, Err(QueryError::MissingData));
    let state = executor.snapshot();
    assert!(state.error);
    assert!(state.error_object.is_none());
    assert!(!state.loaded);
}

#[tokio::test]
async fn test_typed_data_decode_failure() {
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Vec<u32>> = scope.executor(
        ok_op(json!("not a list")),
        ExecutorOptions::default().run_on_mount(false),
    );

    let result = executor.refetch().await;

    assert!(matches!(result, Err(QueryError::Decode(_))));
    let state = executor.snapshot();
    assert!(state.error);
    assert!(state.error_object.is_some());
}

#[tokio::test]
async fn test_typed_data_decodes() {
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Vec<u32>> = scope.executor(
        ok_op(json!({"items": [1, 2, 3]})),
        ExecutorOptions::default().accessor("items"),
    );

    let state = settle(&executor).await;
    assert_eq!(state.data, Some(vec![1, 2, 3]));
}

#[tokio::test]
async fn test_abort_cancels_in_flight_request() {
    let gate = Arc::new(Semaphore::new(0));
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        gated_op(gate, json!(1)),
        ExecutorOptions::default().run_on_mount(false),
    );

    let handle = scope.spawn_query(&executor, None);
    tokio::task::yield_now().await;
    executor.abort();

    assert_eq!(handle.await.unwrap(), Err(QueryError::Cancelled));
    let state = executor.snapshot();
    assert!(!state.loading);
    assert!(!state.error);
    assert!(!executor.cancel_token().is_cancelled());
}

#[tokio::test]
async fn test_second_query_does_not_cancel_first() {
    let gate = Arc::new(Semaphore::new(0));
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        gated_op(Arc::clone(&gate), json!("done")),
        ExecutorOptions::default().run_on_mount(false),
    );

    let first = scope.spawn_query(&executor, None);
    let second = scope.spawn_query(&executor, None);
    tokio::task::yield_now().await;
    gate.add_permits(2);

    assert_eq!(first.await.unwrap(), Ok(json!("done")));
    assert_eq!(second.await.unwrap(), Ok(json!("done")));
}

#[tokio::test]
async fn test_abort_then_query_stays_loading_until_new_request_settles() {
    let gate = Arc::new(Semaphore::new(0));
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        gated_op(Arc::clone(&gate), json!({"a": 1})),
        ExecutorOptions::default().run_on_mount(false),
    );

    let first = scope.spawn_query(&executor, None);
    tokio::task::yield_now().await;
    executor.abort();
    let second = scope.spawn_query(&executor, None);

    assert_eq!(first.await.unwrap(), Err(QueryError::Cancelled));
    let state = executor.snapshot();
    assert!(state.loading);
    assert!(!state.loaded);

    gate.add_permits(1);
    assert_eq!(second.await.unwrap(), Ok(json!({"a": 1})));
    let state = executor.snapshot();
    assert!(!state.loading);
    assert!(state.loaded);
}

#[tokio::test]
async fn test_older_settlement_does_not_end_newer_request() {
    let gate = Arc::new(Semaphore::new(0));
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        gated_op(Arc::clone(&gate), json!("done")),
        ExecutorOptions::default().run_on_mount(false),
    );

    let first = scope.spawn_query(&executor, None);
    let second = scope.spawn_query(&executor, None);
    tokio::task::yield_now().await;

    gate.add_permits(1);
    assert_eq!(first.await.unwrap(), Ok(json!("done")));
    assert!(executor.snapshot().loading);

    gate.add_permits(1);
    assert_eq!(second.await.unwrap(), Ok(json!("done")));
    let state = executor.snapshot();
    assert!(!state.loading);
    assert_eq!(state.data, Some(json!("done")));
}

#[tokio::test]
async fn test_stale_failure_neither_toasts_nor_marks_error() {
    let sink = Arc::new(RecordingSink::default());
    let gate = Arc::new(Semaphore::new(0));
    let scope = QueryScope::current().unwrap();
    let failing = err_op(TransportError::http(
        500,
        json!({"code": "SERVER_ERROR", "message": "Boom"}),
    ));
    let gated = gated_op(Arc::clone(&gate), json!(2));
    let calls = Arc::new(AtomicUsize::new(0));
    let operation = move |args: Option<Args>, config: RequestConfig| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            failing.call(args, config)
        } else {
            gated.call(args, config)
        }
    };
    let executor: RequestExecutor<Value> = scope.executor(
        operation,
        ExecutorOptions::default()
            .run_on_mount(false)
            .toast_error(true)
            .error_sink(sink.clone()),
    );

    // Both requests begin before either operation runs
    let first = executor.refetch();
    let second = scope.spawn_query(&executor, None);

    assert!(matches!(first.await, Err(QueryError::Transport(_))));
    let state = executor.snapshot();
    assert!(state.loading);
    assert!(!state.error);
    assert!(sink.messages().is_empty());

    gate.add_permits(1);
    assert_eq!(second.await.unwrap(), Ok(json!(2)));
    assert!(executor.snapshot().loaded);
}

#[tokio::test]
async fn test_caller_cancel_token_is_honoured() {
    let gate = Arc::new(Semaphore::new(0));
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        gated_op(gate, json!(1)),
        ExecutorOptions::default().run_on_mount(false),
    );

    let token = CancellationToken::new();
    let query = executor.query(None, RequestConfig::default().with_cancel_token(token.clone()));
    token.cancel();

    assert_eq!(query.await, Err(QueryError::Cancelled));
}

#[tokio::test]
async fn test_transport_cancellation_is_not_an_error() {
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        err_op(TransportError::cancelled()),
        ExecutorOptions::default().run_on_mount(false),
    );

    assert_eq!(executor.refetch().await, Err(QueryError::Cancelled));
    let state = executor.snapshot();
    assert!(!state.error);
    assert!(state.error_object.is_none());
}

#[tokio::test]
async fn test_dispose_aborts_and_suppresses_updates() {
    let gate = Arc::new(Semaphore::new(0));
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        gated_op(Arc::clone(&gate), json!(1)),
        ExecutorOptions::default().run_on_mount(false),
    );

    let handle = scope.spawn_query(&executor, None);
    drop(scope);
    gate.add_permits(1);

    assert_eq!(handle.await.unwrap(), Err(QueryError::Cancelled));
    assert!(executor.is_disposed());
    // The cancel transition was suppressed; the snapshot is frozen at loading
    assert!(executor.snapshot().loading);
    assert_eq!(executor.refetch().await, Err(QueryError::Disposed));
}

#[tokio::test]
async fn test_child_scope_disposed_with_parent() {
    let parent = QueryScope::current().unwrap();
    let child = parent.child();
    assert!(!child.is_disposed());

    drop(parent);
    assert!(child.is_disposed());
}

#[tokio::test]
async fn test_failure_toasts_when_enabled() {
    let sink = Arc::new(RecordingSink::default());
    let scope = QueryScope::current().unwrap();
    let failure = TransportError::http(500, json!({"code": "SERVER_ERROR", "message": "Boom"}));
    let executor: RequestExecutor<Value> = scope.executor(
        err_op(failure),
        ExecutorOptions::default()
            .run_on_mount(false)
            .toast_error(true)
            .error_sink(sink.clone()),
    );

    let _ = executor.refetch().await;

    assert_eq!(sink.messages(), vec!["Boom".to_string()]);
}

#[tokio::test]
async fn test_failure_silent_when_toast_disabled() {
    let sink = Arc::new(RecordingSink::default());
    let scope = QueryScope::current().unwrap();
    let failure = TransportError::http(500, json!({"code": "SERVER_ERROR", "message": "Boom"}));
    let executor: RequestExecutor<Value> = scope.executor(
        err_op(failure),
        ExecutorOptions::default()
            .run_on_mount(false)
            .error_sink(sink.clone()),
    );

    let _ = executor.refetch().await;

    assert!(sink.messages().is_empty());
    assert!(executor.snapshot().error);
}

#[tokio::test]
async fn test_subscribers_see_each_settlement() {
    let scope = QueryScope::current().unwrap();
    let executor: RequestExecutor<Value> = scope.executor(
        ok_op(json!(1)),
        ExecutorOptions::default().run_on_mount(false),
    );
    let mut rx = executor.subscribe();
    rx.borrow_and_update();

    executor.refetch().await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().loaded);
}
