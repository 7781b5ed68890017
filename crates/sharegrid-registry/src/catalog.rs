//! Read interface the scheduler consumes.

use sharegrid_state::ServiceRecord;

use crate::error::RegistryResult;

/// Read-only view of the registered fleet.
///
/// Returns raw records, disabled and stale ones included; callers apply
/// their own liveness and enablement policy. Implementations must be safe
/// to share across threads.
pub trait ServiceCatalog: Send + Sync {
    /// All registered services for a topic.
    fn list_services(&self, topic: &str) -> RegistryResult<Vec<ServiceRecord>>;
}
