use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use serde_json::Value;
use tokio::sync::watch;

use crate::config::Config;
use crate::notification::NotificationState;
use crate::query::{
    ErrorSink, ExecutorOptions, Operation, QueryBatchData, QueryScope, RenderDecision,
    RequestExecutor, RequestState, Toast, ToastOptions, is_data_empty,
};
use crate::scroll::ScrollState;

/// One URL and the executor fetching it
pub struct QuerySource {
    pub label: String,
    pub executor: RequestExecutor<Value>,
    state_rx: watch::Receiver<RequestState<Value>>,
}

pub struct App {
    pub sources: Vec<QuerySource>,
    /// Latest snapshot per source, in source order
    pub states: Vec<RequestState<Value>>,
    pub notification: NotificationState,
    pub scroll: ScrollState,
    pub show_empty_error: bool,
    pub should_quit: bool,
    pub needs_render: bool,
    pub frame_count: u64,
    toast_enabled: bool,
    toast_options: ToastOptions,
    toast_tx: Sender<Toast>,
    toast_rx: Receiver<Toast>,
    scope: QueryScope,
}

impl App {
    pub fn new(scope: QueryScope, config: &Config, show_empty_error: bool) -> Self {
        let (toast_tx, toast_rx) = mpsc::channel();
        Self {
            sources: Vec::new(),
            states: Vec::new(),
            notification: NotificationState::new(),
            scroll: ScrollState::new(),
            show_empty_error: show_empty_error || config.view.show_empty_error,
            should_quit: false,
            needs_render: true,
            frame_count: 0,
            toast_enabled: config.toast.enabled,
            toast_options: ToastOptions::from(&config.toast),
            toast_tx,
            toast_rx,
            scope,
        }
    }

    /// Mount an executor for `operation`; its first request starts immediately
    pub fn add_source<O>(&mut self, label: impl Into<String>, operation: O, accessor: Option<&str>)
    where
        O: Operation + 'static,
    {
        let sink: Arc<dyn ErrorSink> = Arc::new(self.toast_tx.clone());
        let mut options = ExecutorOptions::default()
            .toast_error(self.toast_enabled)
            .toast_options(self.toast_options.clone())
            .error_sink(sink);
        if let Some(path) = accessor {
            options = options.accessor(path);
        }

        let executor = self.scope.executor(operation, options);
        let mut state_rx = executor.subscribe();
        let state = state_rx.borrow_and_update().clone();

        self.sources.push(QuerySource {
            label: label.into(),
            executor,
            state_rx,
        });
        self.states.push(state);
        self.needs_render = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn should_render(&self) -> bool {
        self.needs_render || self.is_loading()
    }

    pub fn mark_dirty(&mut self) {
        self.needs_render = true;
    }

    pub fn clear_dirty(&mut self) {
        self.needs_render = false;
    }

    pub fn is_loading(&self) -> bool {
        self.states.iter().any(|s| s.loading)
    }

    /// Pull settled states and queued toasts into the UI thread
    pub fn poll_updates(&mut self) {
        for (source, state) in self.sources.iter_mut().zip(self.states.iter_mut()) {
            if source.state_rx.has_changed().unwrap_or(false) {
                *state = source.state_rx.borrow_and_update().clone();
                self.needs_render = true;
            }
        }

        while let Ok(toast) = self.toast_rx.try_recv() {
            log::debug!("Toast: {}", toast.message);
            self.notification.show_toast(&toast);
            self.needs_render = true;
        }

        if self.notification.clear_if_expired() {
            self.needs_render = true;
        }
    }

    /// Re-run every source
    pub fn retry(&mut self) {
        log::debug!("Retrying {} sources", self.sources.len());
        for source in &self.sources {
            // Detached; the state channel reports the outcome
            drop(self.scope.spawn_query(&source.executor, None));
        }
        self.poll_updates();
        self.needs_render = true;
    }

    /// Batch view decision over all sources
    pub fn decision(&self) -> RenderDecision<Vec<&Value>> {
        let batch = QueryBatchData::new(&self.states);
        if self.show_empty_error {
            batch
                .is_data_empty(|data| data.iter().all(|d| d.is_none_or(is_data_empty)))
                .decide()
        } else {
            batch.decide()
        }
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod app_state_tests;
