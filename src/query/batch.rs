//! Multi-query aggregator
//!
//! [`QueryBatchData`] reduces an ordered list of request states into one
//! [`AggregateState`] and selects a single [`RenderDecision`] for all of them.
//! Content is all-or-nothing: one failed member fails the aggregate.

use super::classify::{ErrorView, classify_list};
use super::error_info::ErrorInfo;
use super::render::RenderDecision;
use super::state::RequestState;

/// Reduced view of several request states
///
/// `data` and `error_object` keep the input order, one entry per member.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateState<'a, T> {
    pub data: Vec<Option<&'a T>>,
    pub loading: bool,
    pub loaded: bool,
    pub error: bool,
    pub error_object: Vec<Option<&'a ErrorInfo>>,
}

/// Reduce member states; an empty list is loaded and neither loading nor failed
pub fn reduce<T>(members: &[RequestState<T>]) -> AggregateState<'_, T> {
    AggregateState {
        data: members.iter().map(|m| m.data.as_ref()).collect(),
        loading: members.iter().any(|m| m.loading),
        loaded: members.iter().all(|m| m.loaded),
        error: members.iter().any(|m| m.error),
        error_object: members.iter().map(|m| m.error_object.as_ref()).collect(),
    }
}

type BatchEmptyCheck<'a, T> = Box<dyn Fn(&[Option<&T>]) -> bool + 'a>;
type BatchErrorClassifier<'a> = Box<dyn Fn(&[Option<&ErrorInfo>]) -> ErrorView + 'a>;

/// Render-decision builder for several requests
pub struct QueryBatchData<'a, T> {
    members: &'a [RequestState<T>],
    is_data_empty: Option<BatchEmptyCheck<'a, T>>,
    render_error: Option<BatchErrorClassifier<'a>>,
}

impl<'a, T> QueryBatchData<'a, T> {
    pub fn new(members: &'a [RequestState<T>]) -> Self {
        Self {
            members,
            is_data_empty: None,
            render_error: None,
        }
    }

    /// Show the empty view when `check` holds for the loaded data
    ///
    /// Without a check the aggregate never selects the empty view.
    pub fn is_data_empty(mut self, check: impl Fn(&[Option<&T>]) -> bool + 'a) -> Self {
        self.is_data_empty = Some(Box::new(check));
        self
    }

    /// Replace the default error-list classification
    pub fn render_error(
        mut self,
        classifier: impl Fn(&[Option<&ErrorInfo>]) -> ErrorView + 'a,
    ) -> Self {
        self.render_error = Some(Box::new(classifier));
        self
    }

    pub fn aggregate(&self) -> AggregateState<'a, T> {
        reduce(self.members)
    }

    /// Select the view for the whole batch
    pub fn decide(&self) -> RenderDecision<Vec<&'a T>> {
        let aggregate = self.aggregate();

        if aggregate.loading {
            return RenderDecision::Loading;
        }

        // Takes priority over the generic error branch
        if aggregate.error_object.iter().flatten().any(|e| e.is_auth_denied()) {
            return RenderDecision::Error(ErrorView::NotFoundOrAccessDenied);
        }

        if aggregate.error {
            let view = match &self.render_error {
                Some(classifier) => classifier(aggregate.error_object.as_slice()),
                None => classify_list(&aggregate.error_object),
            };
            return RenderDecision::Error(view);
        }

        if aggregate.loaded
            && let Some(check) = &self.is_data_empty
            && check(aggregate.data.as_slice())
        {
            return RenderDecision::Empty;
        }

        if aggregate.loaded {
            // Only commit once every member actually produced a value
            let data: Vec<&'a T> = aggregate.data.iter().flatten().copied().collect();
            if data.len() == self.members.len() {
                return RenderDecision::Content(data);
            }
        }

        RenderDecision::Nothing
    }

    /// Select the view, calling `render` with every member's data in order
    pub fn render<V>(&self, render: impl FnOnce(&[&'a T]) -> V) -> RenderDecision<V> {
        self.decide().map(|data| render(&data))
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod batch_tests;
