//! Host state tracking — capability ingest and fleet snapshots.
//!
//! The `HostManager` joins two inputs: the service registry (which hosts
//! exist, their zone, their liveness and enablement) and the capability
//! reports backends push periodically (capacity numbers). A snapshot
//! materializes one `HostState` per live, enabled host at a point in
//! time; nothing is cached across snapshots.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sharegrid_registry::ServiceCatalog;

use crate::config::SchedulerConfig;
use crate::context::RequestContext;
use crate::error::{SchedulerError, SchedulerResult};
use crate::filters::{self, HostFilter};
use crate::request::FilterProperties;
use crate::weights::{self, HostWeigher, WeighedHost};

/// Capacity and capability data one backend reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityReport {
    pub total_capacity_bytes: u64,
    pub free_capacity_bytes: u64,
    /// Percentage of total capacity held back from placement.
    pub reserved_percentage: u8,
    /// Backend-specific details, opaque to the core.
    pub pool_info: serde_json::Value,
}

/// Point-in-time view of one candidate host.
#[derive(Debug, Clone)]
pub struct HostState {
    pub host: String,
    pub total_capacity_bytes: u64,
    pub free_capacity_bytes: u64,
    pub reserved_percentage: u8,
    pub availability_zone: String,
    /// When the backing capability report was received; 0 when the host
    /// has never reported.
    pub last_updated: u64,
    pub pool_info: serde_json::Value,
}

impl HostState {
    /// Free capacity after the reserved fraction of total is held back.
    pub fn usable_capacity_bytes(&self) -> u64 {
        let reserved = (u128::from(self.total_capacity_bytes)
            * u128::from(self.reserved_percentage)
            / 100) as u64;
        self.free_capacity_bytes.saturating_sub(reserved)
    }
}

/// A capability report plus when it arrived.
#[derive(Debug, Clone)]
struct StampedReport {
    report: CapabilityReport,
    received_at: u64,
}

/// Maintains the fleet view and the filter/weigh primitives over it.
pub struct HostManager {
    catalog: Arc<dyn ServiceCatalog>,
    filters: Vec<Box<dyn HostFilter>>,
    weighers: Vec<Box<dyn HostWeigher>>,
    /// Latest capability report per host. Most recent wins.
    capabilities: RwLock<HashMap<String, StampedReport>>,
    /// Heartbeat age beyond which a registered host is dropped from
    /// snapshots.
    service_down_time: Duration,
}

impl HostManager {
    /// Create a manager with explicit plugin chains.
    pub fn new(
        catalog: Arc<dyn ServiceCatalog>,
        filters: Vec<Box<dyn HostFilter>>,
        weighers: Vec<Box<dyn HostWeigher>>,
    ) -> Self {
        Self {
            catalog,
            filters,
            weighers,
            capabilities: RwLock::new(HashMap::new()),
            service_down_time: Duration::from_secs(60),
        }
    }

    /// Set the liveness threshold for snapshot pruning.
    pub fn with_service_down_time(mut self, threshold: Duration) -> Self {
        self.service_down_time = threshold;
        self
    }

    /// Create a manager by resolving plugin names from configuration.
    ///
    /// Fails with `FilterNotFound` / `WeigherNotFound` when a configured
    /// name matches nothing.
    pub fn from_config(
        catalog: Arc<dyn ServiceCatalog>,
        config: &SchedulerConfig,
    ) -> SchedulerResult<Self> {
        let filters = filters::resolve(&config.default_filters)?;
        let weighers = weights::resolve(&config.default_weighers)?;
        Ok(Self::new(catalog, filters, weighers)
            .with_service_down_time(Duration::from_secs(config.service_down_time_secs)))
    }

    /// Ingest a capability report from a backend. Most recent report wins.
    ///
    /// Reports claiming more free than total capacity are clamped so the
    /// fleet view never violates `free <= total`.
    pub fn update_service_capabilities(&self, host: &str, mut report: CapabilityReport) {
        if report.free_capacity_bytes > report.total_capacity_bytes {
            warn!(
                %host,
                free = report.free_capacity_bytes,
                total = report.total_capacity_bytes,
                "capability report claims more free than total, clamping"
            );
            report.free_capacity_bytes = report.total_capacity_bytes;
        }

        let stamped = StampedReport {
            report,
            received_at: epoch_secs(),
        };
        let mut capabilities = self
            .capabilities
            .write()
            .expect("capability map lock poisoned");
        capabilities.insert(host.to_string(), stamped);
        debug!(%host, "capability report ingested");
    }

    /// Materialize the current fleet view for a topic.
    ///
    /// Requires an administrative context: capacity data is not visible
    /// under project-scoped authorization. Disabled hosts and hosts with
    /// stale heartbeats are dropped; a host that has not reported
    /// capabilities yet appears with zeroed capacity. An empty fleet is
    /// `Ok(vec![])`, not an error.
    pub fn snapshot(
        &self,
        ctx: &RequestContext,
        topic: &str,
    ) -> SchedulerResult<Vec<HostState>> {
        if !ctx.is_admin {
            return Err(SchedulerError::AdminRequired);
        }

        let records = self.catalog.list_services(topic)?;
        let now = epoch_secs();
        let capabilities = self
            .capabilities
            .read()
            .expect("capability map lock poisoned");

        let mut hosts = Vec::with_capacity(records.len());
        for record in records {
            if record.disabled {
                debug!(host = %record.host, "skipping disabled service");
                continue;
            }
            if !record.is_up(now, self.service_down_time.as_secs()) {
                warn!(
                    host = %record.host,
                    last_heartbeat = record.last_heartbeat,
                    "skipping down service"
                );
                continue;
            }

            let state = match capabilities.get(&record.host) {
                Some(stamped) => HostState {
                    host: record.host,
                    total_capacity_bytes: stamped.report.total_capacity_bytes,
                    free_capacity_bytes: stamped.report.free_capacity_bytes,
                    reserved_percentage: stamped.report.reserved_percentage,
                    availability_zone: record.availability_zone,
                    last_updated: stamped.received_at,
                    pool_info: stamped.report.pool_info.clone(),
                },
                None => HostState {
                    host: record.host,
                    total_capacity_bytes: 0,
                    free_capacity_bytes: 0,
                    reserved_percentage: 0,
                    availability_zone: record.availability_zone,
                    last_updated: 0,
                    pool_info: serde_json::Value::Null,
                },
            };
            hosts.push(state);
        }

        debug!(topic, count = hosts.len(), "fleet snapshot built");
        Ok(hosts)
    }

    /// Apply the configured filter chain in order.
    pub fn filter_hosts(
        &self,
        hosts: Vec<HostState>,
        props: &FilterProperties,
    ) -> Vec<HostState> {
        filters::apply_filters(hosts, &self.filters, props)
    }

    /// Score and rank hosts with the configured weighers, best first.
    pub fn weigh_hosts(
        &self,
        hosts: Vec<HostState>,
        props: &FilterProperties,
    ) -> Vec<WeighedHost> {
        weights::rank_hosts(hosts, &self.weighers, props)
    }
}

/// Current Unix epoch in seconds.
fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
