//! Request state
//!
//! The state snapshot of one executor and its transitions. Transitions are
//! pure so the lifecycle can be tested without a runtime.

use super::error_info::ErrorInfo;

/// Snapshot of one request's lifecycle
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: bool,
    /// Derived: `!loading && !error && data.is_some()`
    pub loaded: bool,
    pub error_object: Option<ErrorInfo>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::new(None, false)
    }
}

impl<T> RequestState<T> {
    /// Initial state; `loading` when the executor runs on mount
    pub fn new(initial_data: Option<T>, loading: bool) -> Self {
        let mut state = Self {
            data: initial_data,
            loading,
            error: false,
            loaded: false,
            error_object: None,
        };
        state.refresh_loaded();
        state
    }

    /// A settled, successful state holding `data`
    pub fn settled(data: T) -> Self {
        Self::new(Some(data), false)
    }

    /// A settled, failed state
    pub fn failed(error: ErrorInfo) -> Self {
        let mut state = Self::new(None, false);
        state.fail(error);
        state
    }

    /// A request is starting
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = false;
        self.error_object = None;
        self.refresh_loaded();
    }

    /// The request resolved with data
    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = false;
        self.error_object = None;
        self.refresh_loaded();
    }

    /// The request resolved but carried nothing; fall back to `initial_data`
    pub fn fail_missing(&mut self, initial_data: Option<T>) {
        self.data = initial_data;
        self.loading = false;
        self.error = true;
        self.refresh_loaded();
    }

    /// The request failed; previous data is kept
    pub fn fail(&mut self, error: ErrorInfo) {
        self.loading = false;
        self.error = true;
        self.error_object = Some(error);
        self.refresh_loaded();
    }

    /// The request was cancelled; nothing but `loading` changes
    pub fn cancel(&mut self) {
        self.loading = false;
        self.refresh_loaded();
    }

    fn refresh_loaded(&mut self) {
        self.loaded = !self.loading && !self.error && self.data.is_some();
    }
}
