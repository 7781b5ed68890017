//! Scheduler error types.

use thiserror::Error;

/// Errors that can occur during placement scheduling.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A configuration value failed validation at construction.
    #[error("invalid parameter value: {0}")]
    InvalidParameterValue(String),

    /// No host could be selected: every candidate was excluded, filtered
    /// out, or the retry budget is spent. The message says which.
    #[error("no valid host was found: {0}")]
    NoValidHost(String),

    /// A configured filter name matches no known filter.
    #[error("scheduler host filter {0} could not be found")]
    FilterNotFound(String),

    /// A configured weigher name matches no known weigher.
    #[error("scheduler host weigher {0} could not be found")]
    WeigherNotFound(String),

    /// The operation requires an administrative context.
    #[error("administrative context required")]
    AdminRequired,

    /// The caller abandoned the request mid-flight.
    #[error("request cancelled")]
    Cancelled,

    /// The service registry failed. Fatal for the attempt; never folded
    /// into the zero-hosts case.
    #[error("registry error: {0}")]
    Registry(#[from] sharegrid_registry::RegistryError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
