//! Single-query renderer
//!
//! [`QueryData`] turns one request state into a [`RenderDecision`]: loading,
//! an error view, the empty view, or content. Content callbacks receive a
//! [`QueryContext`] giving nested views the data and the executor handle
//! without threading them through every call.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::classify::{ErrorView, classify};
use super::error_info::ErrorInfo;
use super::executor::RequestExecutor;
use super::state::RequestState;
use super::types::QueryError;

/// Which view a screen shows
#[derive(Debug, Clone, PartialEq)]
pub enum RenderDecision<C> {
    Loading,
    Error(ErrorView),
    Empty,
    Content(C),
    /// Nothing to show yet (e.g. idle executor without data)
    Nothing,
}

impl<C> RenderDecision<C> {
    pub fn map<D>(self, f: impl FnOnce(C) -> D) -> RenderDecision<D> {
        match self {
            RenderDecision::Loading => RenderDecision::Loading,
            RenderDecision::Error(view) => RenderDecision::Error(view),
            RenderDecision::Empty => RenderDecision::Empty,
            RenderDecision::Content(c) => RenderDecision::Content(f(c)),
            RenderDecision::Nothing => RenderDecision::Nothing,
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, RenderDecision::Content(_))
    }

    pub fn content(self) -> Option<C> {
        match self {
            RenderDecision::Content(c) => Some(c),
            _ => None,
        }
    }
}

/// Default emptiness check used by [`QueryData`]
pub trait DataShape {
    fn is_empty_data(&self) -> bool;
}

/// Empty array, object without keys, or object whose `results` is empty
pub fn is_data_empty(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => {
            map.is_empty()
                || map
                    .get("results")
                    .and_then(Value::as_array)
                    .is_some_and(|results| results.is_empty())
        }
        _ => false,
    }
}

impl DataShape for Value {
    fn is_empty_data(&self) -> bool {
        is_data_empty(self)
    }
}

impl<T> DataShape for Vec<T> {
    fn is_empty_data(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> DataShape for BTreeMap<K, V> {
    fn is_empty_data(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> DataShape for HashMap<K, V, S> {
    fn is_empty_data(&self) -> bool {
        self.is_empty()
    }
}

/// What content callbacks can read from the enclosing renderer
pub struct QueryContext<'a, T> {
    pub data: &'a T,
    pub state: &'a RequestState<T>,
    executor: Option<&'a RequestExecutor<T>>,
}

impl<'a, T> QueryContext<'a, T> {
    pub fn error_object(&self) -> Option<&'a ErrorInfo> {
        self.state.error_object.as_ref()
    }

    /// Executor that produced the data, for re-querying
    pub fn executor(&self) -> Option<&'a RequestExecutor<T>> {
        self.executor
    }
}

impl<T> QueryContext<'_, T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn cancel_token(&self) -> Option<CancellationToken> {
        self.executor.map(RequestExecutor::cancel_token)
    }
}

type EmptyCheck<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;
type ErrorClassifier<'a> = Box<dyn Fn(Option<&ErrorInfo>) -> ErrorView + 'a>;

/// Render-decision builder for one request
pub struct QueryData<'a, T> {
    state: &'a RequestState<T>,
    executor: Option<&'a RequestExecutor<T>>,
    is_data_empty: EmptyCheck<'a, T>,
    render_error: Option<ErrorClassifier<'a>>,
    show_empty_error: bool,
}

impl<'a, T: DataShape + 'a> QueryData<'a, T> {
    /// Builder using the data's own [`DataShape`] emptiness
    pub fn new(state: &'a RequestState<T>) -> Self {
        Self::with_empty_check(state, |data: &T| data.is_empty_data())
    }
}

impl<'a, T: 'a> QueryData<'a, T> {
    /// Builder for data without a [`DataShape`] impl
    pub fn with_empty_check(state: &'a RequestState<T>, check: impl Fn(&T) -> bool + 'a) -> Self {
        Self {
            state,
            executor: None,
            is_data_empty: Box::new(check),
            render_error: None,
            show_empty_error: false,
        }
    }

    /// Expose `executor` to content callbacks through the context
    pub fn with_executor(mut self, executor: &'a RequestExecutor<T>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Show the empty view instead of content when data is empty
    pub fn show_empty_error(mut self, show: bool) -> Self {
        self.show_empty_error = show;
        self
    }

    pub fn is_data_empty(mut self, check: impl Fn(&T) -> bool + 'a) -> Self {
        self.is_data_empty = Box::new(check);
        self
    }

    /// Replace the default error classification
    pub fn render_error(mut self, classifier: impl Fn(Option<&ErrorInfo>) -> ErrorView + 'a) -> Self {
        self.render_error = Some(Box::new(classifier));
        self
    }

    /// Select the view; first match wins
    pub fn decide(&self) -> RenderDecision<&'a T> {
        let state = self.state;

        if state.loading {
            return RenderDecision::Loading;
        }
        if state.error {
            let err = state.error_object.as_ref();
            let view = match &self.render_error {
                Some(classifier) => classifier(err),
                None => classify(err),
            };
            return RenderDecision::Error(view);
        }
        match &state.data {
            Some(data) if state.loaded => {
                if self.show_empty_error && (self.is_data_empty)(data) {
                    RenderDecision::Empty
                } else {
                    RenderDecision::Content(data)
                }
            }
            _ => RenderDecision::Nothing,
        }
    }

    /// Context handed to content callbacks
    ///
    /// Fails with [`QueryError::ContextOutsideContent`] unless the decision
    /// is content.
    pub fn context(&self) -> Result<QueryContext<'a, T>, QueryError> {
        match self.decide() {
            RenderDecision::Content(data) => Ok(QueryContext {
                data,
                state: self.state,
                executor: self.executor,
            }),
            _ => Err(QueryError::ContextOutsideContent),
        }
    }

    /// Select the view, calling `render` only for content
    pub fn render<V>(&self, render: impl FnOnce(&QueryContext<'a, T>) -> V) -> RenderDecision<V> {
        self.decide().map(|data| {
            render(&QueryContext {
                data,
                state: self.state,
                executor: self.executor,
            })
        })
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
