//! Request executor
//!
//! Owns the lifecycle of one backend operation. Each `query()` marks the state
//! as loading, runs the operation against a cancellation token, and settles
//! the state to data or a normalized error. State snapshots are published on
//! a `watch` channel so screens can re-render when a request settles.
//!
//! Executors live in a [`QueryScope`]. Dropping the scope cancels every
//! in-flight request created in it and suppresses later state updates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::accessor;
use super::error_info::ErrorInfo;
use super::operation::{Args, Operation, RequestConfig};
use super::state::RequestState;
use super::toast::{ErrorSink, ToastOptions, toast_message};
use super::types::QueryError;

/// Construction options for a [`RequestExecutor`]
pub struct ExecutorOptions<T> {
    /// Run `query()` once, without arguments, when mounted
    pub run_on_mount: bool,
    pub initial_data: Option<T>,
    /// Key path projected out of the raw response, e.g. `items`
    pub accessor: Option<String>,
    /// Surface failures through `error_sink`
    pub toast_error: bool,
    pub toast_options: ToastOptions,
    pub error_sink: Option<Arc<dyn ErrorSink>>,
}

impl<T> Default for ExecutorOptions<T> {
    fn default() -> Self {
        Self {
            run_on_mount: true,
            initial_data: None,
            accessor: None,
            toast_error: false,
            toast_options: ToastOptions::default(),
            error_sink: None,
        }
    }
}

impl<T> ExecutorOptions<T> {
    pub fn run_on_mount(mut self, run_on_mount: bool) -> Self {
        self.run_on_mount = run_on_mount;
        self
    }

    pub fn initial_data(mut self, data: T) -> Self {
        self.initial_data = Some(data);
        self
    }

    pub fn accessor(mut self, path: impl Into<String>) -> Self {
        self.accessor = Some(path.into());
        self
    }

    pub fn toast_error(mut self, enabled: bool) -> Self {
        self.toast_error = enabled;
        self
    }

    pub fn toast_options(mut self, options: ToastOptions) -> Self {
        self.toast_options = options;
        self
    }

    pub fn error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = Some(sink);
        self
    }
}

/// Cancellation and runtime scope shared by a group of executors
///
/// The equivalent of a mounted component: dropping it aborts all requests
/// started by its executors.
pub struct QueryScope {
    token: CancellationToken,
    handle: Handle,
    _guard: DropGuard,
}

impl QueryScope {
    pub fn new(handle: Handle) -> Self {
        let token = CancellationToken::new();
        Self {
            _guard: token.clone().drop_guard(),
            token,
            handle,
        }
    }

    /// Scope bound to the runtime of the calling context
    pub fn current() -> Result<Self, QueryError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| QueryError::NoRuntime)
    }

    /// Nested scope, disposed with this one or on its own drop
    pub fn child(&self) -> Self {
        let token = self.token.child_token();
        Self {
            _guard: token.clone().drop_guard(),
            token,
            handle: self.handle.clone(),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Create an executor in this scope and mount it
    pub fn executor<T, O>(&self, operation: O, options: ExecutorOptions<T>) -> RequestExecutor<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
        O: Operation + 'static,
    {
        let executor = RequestExecutor::new(Arc::new(operation), options, &self.token);
        if executor.inner.run_on_mount {
            log::debug!("Mounting executor with initial query");
            self.spawn_query(&executor, None);
        }
        executor
    }

    /// Start a query in the background; the state is loading on return
    pub fn spawn_query<T>(
        &self,
        executor: &RequestExecutor<T>,
        args: Option<Args>,
    ) -> JoinHandle<Result<T, QueryError>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.handle
            .spawn(executor.query(args, RequestConfig::default()))
    }
}

struct Inner<T> {
    operation: Arc<dyn Operation>,
    run_on_mount: bool,
    initial_data: Option<T>,
    accessor: Option<String>,
    toast_error: bool,
    toast_options: ToastOptions,
    error_sink: Option<Arc<dyn ErrorSink>>,
    state: watch::Sender<RequestState<T>>,
    scope_token: CancellationToken,
    current_token: Mutex<CancellationToken>,
    /// Id of the most recently started request; only it may settle the state
    latest_request: AtomicU64,
}

/// Handle to one operation's lifecycle and state
///
/// Cloning is cheap; clones share state and cancellation.
pub struct RequestExecutor<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for RequestExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> RequestExecutor<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create an executor whose requests are cancelled with `scope_token`
    ///
    /// Does not run the mount query; use [`QueryScope::executor`] for that.
    pub fn new(
        operation: Arc<dyn Operation>,
        options: ExecutorOptions<T>,
        scope_token: &CancellationToken,
    ) -> Self {
        let initial = RequestState::new(options.initial_data.clone(), options.run_on_mount);
        let (state, _) = watch::channel(initial);

        Self {
            inner: Arc::new(Inner {
                operation,
                run_on_mount: options.run_on_mount,
                initial_data: options.initial_data,
                accessor: options.accessor,
                toast_error: options.toast_error,
                toast_options: options.toast_options,
                error_sink: options.error_sink,
                state,
                scope_token: scope_token.clone(),
                current_token: Mutex::new(scope_token.child_token()),
                latest_request: AtomicU64::new(0),
            }),
        }
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> RequestState<T> {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.inner.state.subscribe()
    }

    /// Token passed to requests that do not bring their own
    pub fn cancel_token(&self) -> CancellationToken {
        self.inner
            .current_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cancel requests using the executor's token and arm a fresh one
    pub fn abort(&self) {
        let mut current = self
            .inner
            .current_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        current.cancel();
        *current = self.inner.scope_token.child_token();
        log::debug!("Executor aborted in-flight requests");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.scope_token.is_cancelled()
    }

    /// Run the operation
    ///
    /// The state is marked loading before this returns; the returned future
    /// settles it. A second call does not cancel the first, but once it has
    /// started only its own outcome is written to the state.
    pub fn query(
        &self,
        args: Option<Args>,
        config: RequestConfig,
    ) -> BoxFuture<'static, Result<T, QueryError>> {
        let inner = Arc::clone(&self.inner);
        let started = inner.begin(config);
        async move {
            let (request_id, config) = started?;
            inner.run(request_id, args, config).await
        }
        .boxed()
    }

    /// Re-run with no arguments
    pub fn refetch(&self) -> BoxFuture<'static, Result<T, QueryError>> {
        self.query(None, RequestConfig::default())
    }
}

impl<T> Inner<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Apply a transition unless the scope is gone
    fn update(&self, transition: impl FnOnce(&mut RequestState<T>)) {
        if self.scope_token.is_cancelled() {
            log::debug!("Skipping state update after dispose");
            return;
        }
        self.state.send_modify(transition);
    }

    /// Apply a settlement of `request_id` only if no newer request started
    ///
    /// The check runs under the state lock, the same lock `begin` takes, so a
    /// newer request can never be marked settled by an older one.
    fn settle(&self, request_id: u64, transition: impl FnOnce(&mut RequestState<T>)) {
        if self.scope_token.is_cancelled() {
            log::debug!("Skipping state update after dispose");
            return;
        }
        let applied = self.state.send_if_modified(|state| {
            if self.latest_request.load(Ordering::Acquire) != request_id {
                return false;
            }
            transition(state);
            true
        });
        if !applied {
            log::debug!("Ignoring stale settlement of request {}", request_id);
        }
    }

    fn is_latest(&self, request_id: u64) -> bool {
        self.latest_request.load(Ordering::Acquire) == request_id
    }

    fn begin(&self, mut config: RequestConfig) -> Result<(u64, RequestConfig), QueryError> {
        if self.scope_token.is_cancelled() {
            return Err(QueryError::Disposed);
        }

        if config.cancel_token.is_none() {
            let token = self
                .current_token
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            config.cancel_token = Some(token);
        }

        let mut request_id = 0;
        self.update(|state| {
            request_id = self.latest_request.fetch_add(1, Ordering::AcqRel) + 1;
            state.begin();
        });
        log::debug!("Starting request {}", request_id);
        Ok((request_id, config))
    }

    async fn run(
        &self,
        request_id: u64,
        args: Option<Args>,
        config: RequestConfig,
    ) -> Result<T, QueryError> {
        let token = config
            .cancel_token
            .clone()
            .unwrap_or_else(CancellationToken::new);
        let scope_token = self.scope_token.clone();
        let call = self.operation.call(args, config);

        let outcome = tokio::select! {
            biased;

            _ = token.cancelled() => None,
            _ = scope_token.cancelled() => None,
            result = call => Some(result),
        };

        match outcome {
            None => {
                log::debug!("Request {} was cancelled", request_id);
                self.settle(request_id, RequestState::cancel);
                Err(QueryError::Cancelled)
            }
            Some(Ok(response)) => self.settle_response(request_id, response.data),
            Some(Err(err)) => {
                let info = ErrorInfo::normalize(&err);
                if info.is_cancelled() || token.is_cancelled() {
                    log::debug!("Request {} was cancelled by the transport", request_id);
                    self.settle(request_id, RequestState::cancel);
                    return Err(QueryError::Cancelled);
                }

                log::debug!("Request {} failed: {}", request_id, info);
                if self.is_latest(request_id) {
                    self.maybe_toast(&info);
                }
                self.settle(request_id, |state| state.fail(info.clone()));
                Err(QueryError::Transport(info))
            }
        }
    }

    fn settle_response(&self, request_id: u64, data: Value) -> Result<T, QueryError> {
        let projected = match &self.accessor {
            Some(path) => accessor::project(&data, path).cloned(),
            None => Some(data),
        };

        let value = match (projected, &self.initial_data) {
            (Some(value), _) if !value.is_null() => value,
            // A missing accessor path falls back to the initial data
            (None, Some(initial)) => {
                log::debug!("Request {} used initial data for missing path", request_id);
                let initial = initial.clone();
                self.settle(request_id, |state| state.succeed(initial.clone()));
                return Ok(initial);
            }
            _ => {
                log::debug!("Request {} resolved without data", request_id);
                let initial = self.initial_data.clone();
                self.settle(request_id, |state| state.fail_missing(initial));
                return Err(QueryError::MissingData);
            }
        };

        match serde_json::from_value::<T>(value) {
            Ok(data) => {
                log::debug!("Request {} succeeded", request_id);
                self.settle(request_id, |state| state.succeed(data.clone()));
                Ok(data)
            }
            Err(e) => {
                let info = ErrorInfo::from_message(format!("Failed to decode response: {}", e));
                log::debug!("Request {} could not be decoded: {}", request_id, e);
                self.settle(request_id, |state| state.fail(info));
                Err(QueryError::Decode(e.to_string()))
            }
        }
    }

    fn maybe_toast(&self, info: &ErrorInfo) {
        if !self.toast_error {
            return;
        }
        if let Some(sink) = &self.error_sink
            && let Some(message) = toast_message(info, &self.toast_options)
        {
            sink.toast(self.toast_options.variant, &message);
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod executor_tests;
