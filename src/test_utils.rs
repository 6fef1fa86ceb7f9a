//! Shared test utilities for queryview
//!
//! Scripted operations and sinks used across the query and app tests.

#[cfg(test)]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use serde_json::{Value, json};
    use tokio::sync::Semaphore;

    use crate::app::App;
    use crate::config::Config;
    use crate::query::{
        Args, ErrorInfo, ErrorSink, Operation, QueryScope, RequestConfig, RequestState, Response,
        Toast, ToastVariant, TransportError,
    };

    /// Operation that always resolves with `data`
    pub fn ok_op(data: Value) -> impl Operation {
        move |_args: Option<Args>, _config: RequestConfig| {
            let data = data.clone();
            async move { Ok(Response::ok(data)) }
        }
    }

    /// Operation that always fails with `err`
    pub fn err_op(err: TransportError) -> impl Operation {
        move |_args: Option<Args>, _config: RequestConfig| {
            let err = err.clone();
            async move { Err(err) }
        }
    }

    /// Failure whose body carries `code`
    pub fn backend_error(code: &str) -> TransportError {
        TransportError::with_backend_code(code)
    }

    /// Operation replaying `outcomes` in order; the last one repeats
    pub fn scripted_op(outcomes: Vec<Result<Value, TransportError>>) -> impl Operation {
        let queue = Arc::new(Mutex::new(VecDeque::from(outcomes)));
        move |_args: Option<Args>, _config: RequestConfig| {
            let outcome = {
                let mut queue = queue.lock().unwrap();
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            };
            async move {
                match outcome {
                    Some(Ok(data)) => Ok(Response::ok(data)),
                    Some(Err(err)) => Err(err),
                    None => Ok(Response::ok(Value::Null)),
                }
            }
        }
    }

    /// Operation that waits for a permit on `gate` before resolving
    pub fn gated_op(gate: Arc<Semaphore>, data: Value) -> impl Operation {
        move |_args: Option<Args>, _config: RequestConfig| {
            let gate = Arc::clone(&gate);
            let data = data.clone();
            async move {
                let _permit = gate.acquire().await;
                Ok(Response::ok(data))
            }
        }
    }

    /// Operation echoing its arguments and counting calls
    pub fn echo_op(calls: Arc<AtomicUsize>) -> impl Operation {
        move |args: Option<Args>, _config: RequestConfig| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                Ok(Response::ok(json!({
                    "call": n,
                    "args": args.map(Value::Object).unwrap_or(Value::Null),
                })))
            }
        }
    }

    /// Sink that records every toast
    #[derive(Default)]
    pub struct RecordingSink {
        pub toasts: Mutex<Vec<Toast>>,
    }

    impl ErrorSink for RecordingSink {
        fn toast(&self, variant: ToastVariant, message: &str) {
            self.toasts.lock().unwrap().push(Toast {
                variant,
                message: message.to_string(),
            });
        }
    }

    impl RecordingSink {
        pub fn messages(&self) -> Vec<String> {
            self.toasts
                .lock()
                .unwrap()
                .iter()
                .map(|t| t.message.clone())
                .collect()
        }
    }

    /// Settled successful state
    pub fn loaded(data: Value) -> RequestState<Value> {
        RequestState::settled(data)
    }

    /// In-flight state
    pub fn loading() -> RequestState<Value> {
        RequestState::new(None, true)
    }

    /// Settled failed state with a backend code
    pub fn failed(code: &str) -> RequestState<Value> {
        RequestState::failed(ErrorInfo::with_code(code))
    }

    /// App in the current runtime with no sources
    pub fn test_app(config: &Config) -> App {
        App::new(QueryScope::current().unwrap(), config, false)
    }

    /// Wait until no source is loading, then pull the results into the app
    pub async fn settle_app(app: &mut App) {
        for source in &app.sources {
            let mut rx = source.executor.subscribe();
            rx.wait_for(|s| !s.loading).await.unwrap();
        }
        app.poll_updates();
    }
}
