//! Registry manager — tracks backend service state.
//!
//! Manages the set of backend hosts known under each topic, their
//! heartbeats, and administrative enable/disable state.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use sharegrid_state::{ServiceRecord, StateStore};

use crate::catalog::ServiceCatalog;
use crate::error::RegistryResult;

/// Operator-facing status of a registered service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Up,
    Down,
    Disabled,
}

/// Manages service registration state.
///
/// Persists records to the `StateStore` and computes liveness from
/// heartbeat age for operator status views.
pub struct RegistryManager {
    state: StateStore,
    /// Heartbeat age beyond which a service counts as down.
    down_threshold: Duration,
}

impl RegistryManager {
    /// Create a new registry manager.
    pub fn new(state: StateStore) -> Self {
        Self {
            state,
            down_threshold: Duration::from_secs(60),
        }
    }

    /// Set the down-detection threshold.
    pub fn with_down_threshold(mut self, threshold: Duration) -> Self {
        self.down_threshold = threshold;
        self
    }

    /// Register a backend host under a topic.
    ///
    /// Upserts the record and stamps the heartbeat. Re-registering an
    /// existing host refreshes its zone and heartbeat but preserves its
    /// disabled flag, so a restart never re-enables a drained backend.
    pub fn register(&self, host: &str, topic: &str, availability_zone: &str) -> RegistryResult<()> {
        let disabled = self
            .state
            .get_service(topic, host)?
            .map(|r| r.disabled)
            .unwrap_or(false);

        let record = ServiceRecord {
            host: host.to_string(),
            topic: topic.to_string(),
            availability_zone: availability_zone.to_string(),
            disabled,
            last_heartbeat: epoch_secs(),
        };

        self.state.put_service(&record)?;
        info!(%host, %topic, zone = %availability_zone, "service registered");
        Ok(())
    }

    /// Process a heartbeat from a host.
    ///
    /// Refreshes the last-seen timestamp. Returns false for an unknown
    /// host; heartbeats never implicitly register.
    pub fn heartbeat(&self, topic: &str, host: &str) -> RegistryResult<bool> {
        match self.state.get_service(topic, host)? {
            Some(mut record) => {
                record.last_heartbeat = epoch_secs();
                self.state.put_service(&record)?;
                debug!(%host, %topic, "heartbeat received");
                Ok(true)
            }
            None => {
                warn!(%host, %topic, "heartbeat from unknown service");
                Ok(false)
            }
        }
    }

    /// Administratively enable or disable a host.
    ///
    /// Returns false for an unknown host.
    pub fn set_disabled(&self, topic: &str, host: &str, disabled: bool) -> RegistryResult<bool> {
        match self.state.get_service(topic, host)? {
            Some(mut record) => {
                record.disabled = disabled;
                self.state.put_service(&record)?;
                info!(%host, %topic, disabled, "service enablement changed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a host from the registry. Returns true if it existed.
    pub fn deregister(&self, topic: &str, host: &str) -> RegistryResult<bool> {
        let existed = self.state.delete_service(topic, host)?;
        if existed {
            info!(%host, %topic, "service deregistered");
        }
        Ok(existed)
    }

    /// Status of a single host, or None if unregistered.
    pub fn service_status(&self, topic: &str, host: &str) -> RegistryResult<Option<ServiceStatus>> {
        let now = epoch_secs();
        Ok(self
            .state
            .get_service(topic, host)?
            .map(|record| self.status_of(&record, now)))
    }

    /// Count of up (live, enabled) hosts for a topic.
    pub fn up_count(&self, topic: &str) -> RegistryResult<usize> {
        let now = epoch_secs();
        let records = self.state.list_services(topic)?;
        Ok(records
            .iter()
            .filter(|r| self.status_of(r, now) == ServiceStatus::Up)
            .count())
    }

    fn status_of(&self, record: &ServiceRecord, now: u64) -> ServiceStatus {
        if record.disabled {
            ServiceStatus::Disabled
        } else if record.is_up(now, self.down_threshold.as_secs()) {
            ServiceStatus::Up
        } else {
            ServiceStatus::Down
        }
    }
}

impl ServiceCatalog for RegistryManager {
    fn list_services(&self, topic: &str) -> RegistryResult<Vec<ServiceRecord>> {
        Ok(self.state.list_services(topic)?)
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
