//! Recovery from stale computations
//!
//! Classification only picks a view. Screens that can repair the condition
//! look up a [`Recovery`] for the error, run the matching recompute
//! operation, and then refresh the queries that depend on it.

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;

use super::error_info::{ErrorInfo, ErrorKind, StaleComputation, codes};
use super::executor::RequestExecutor;
use super::types::QueryError;

/// Caller-side action that clears a backend error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    RecalculateMaturity,
    RecalculateConfidence,
    /// The kit version is deprecated and must be migrated
    MigrateKitVersion,
}

impl Recovery {
    pub fn for_error(err: &ErrorInfo) -> Option<Self> {
        match err.kind {
            ErrorKind::StaleCompute(StaleComputation::Maturity) => {
                Some(Recovery::RecalculateMaturity)
            }
            ErrorKind::StaleCompute(StaleComputation::Confidence) => {
                Some(Recovery::RecalculateConfidence)
            }
            _ if err.code.as_deref() == Some(codes::DEPRECATED) => {
                Some(Recovery::MigrateKitVersion)
            }
            _ => None,
        }
    }
}

/// Anything that can be re-queried without arguments
pub trait Refresh: Send + Sync {
    fn refresh(&self) -> BoxFuture<'static, Result<(), QueryError>>;
}

impl<T> Refresh for RequestExecutor<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn refresh(&self) -> BoxFuture<'static, Result<(), QueryError>> {
        self.refetch().map(|result| result.map(|_| ())).boxed()
    }
}

/// Run `recompute`, then re-query each of `refresh` in order
///
/// Stops at the first failure.
pub async fn run_with_refresh(
    recompute: &dyn Refresh,
    refresh: &[&dyn Refresh],
) -> Result<(), QueryError> {
    recompute.refresh().await?;
    log::debug!("Recompute finished, refreshing {} queries", refresh.len());
    for query in refresh {
        query.refresh().await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod recovery_tests;
