pub mod accessor;
pub mod batch;
pub mod classify;
pub mod error_info;
pub mod executor;
pub mod operation;
pub mod recovery;
pub mod render;
pub mod state;
pub mod toast;
pub mod types;

// Re-export public types
pub use batch::{AggregateState, QueryBatchData, reduce};
pub use classify::{ErrorView, classify, classify_list, has_view_permission};
pub use error_info::{AuthDenial, ErrorInfo, ErrorKind, ErrorMessage, StaleComputation, codes};
pub use executor::{ExecutorOptions, QueryScope, RequestExecutor};
pub use operation::{Args, Operation, RequestConfig, Response, TransportError};
pub use recovery::{Recovery, Refresh, run_with_refresh};
pub use render::{DataShape, QueryContext, QueryData, RenderDecision, is_data_empty};
pub use state::RequestState;
pub use toast::{ErrorSink, Toast, ToastOptions, ToastVariant, toast_message};
pub use types::QueryError;
