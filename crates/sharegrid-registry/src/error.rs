//! Error types for the registry crate.

use thiserror::Error;

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors surfaced by the service registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The backing store failed.
    #[error("registry store: {0}")]
    Store(#[from] sharegrid_state::StateError),

    /// The registry could not be reached at all.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}
