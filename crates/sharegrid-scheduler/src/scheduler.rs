//! Filter scheduler — filtered, weighted placement with bounded retry.
//!
//! Each call places one share: snapshot the fleet, drop hosts that
//! already failed this request, run the filter chain, rank the survivors,
//! return the best host. Retry bookkeeping lives in the caller-owned
//! `FilterProperties`, so the scheduler itself is stateless between
//! calls: a failed provision is retried by invoking it again with the
//! same properties bag, and the accumulated exclusion list steers the
//! next attempt away from hosts already tried.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use sharegrid_registry::ServiceCatalog;

use crate::config::SchedulerConfig;
use crate::context::RequestContext;
use crate::error::{SchedulerError, SchedulerResult};
use crate::hosts::{CapabilityReport, HostManager, HostState};
use crate::options::SchedulerOptions;
use crate::request::{FilterProperties, RequestSpec, RetryInfo};
use crate::weights::WeighedHost;

/// Places shares by filtering and weighing the registered fleet.
pub struct FilterScheduler {
    host_manager: HostManager,
    options: SchedulerOptions,
    max_attempts: u32,
    share_topic: String,
}

impl fmt::Debug for FilterScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterScheduler")
            .field("max_attempts", &self.max_attempts)
            .field("share_topic", &self.share_topic)
            .finish_non_exhaustive()
    }
}

impl FilterScheduler {
    /// Create a scheduler from deployment configuration.
    ///
    /// Fails when `max_attempts` is zero or a configured filter/weigher
    /// name is unknown; both are configuration errors, caught once here
    /// rather than per request.
    pub fn new(
        config: &SchedulerConfig,
        catalog: Arc<dyn ServiceCatalog>,
    ) -> SchedulerResult<Self> {
        if config.max_attempts < 1 {
            return Err(SchedulerError::InvalidParameterValue(format!(
                "max_attempts must be at least 1, got {}",
                config.max_attempts
            )));
        }

        let host_manager = HostManager::from_config(catalog, config)?;
        Ok(Self {
            host_manager,
            options: SchedulerOptions::new(config.options_path.clone()),
            max_attempts: config.max_attempts,
            share_topic: config.share_topic.clone(),
        })
    }

    /// Maximum placement attempts per request.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Ingest a capability report from a backend.
    pub fn update_service_capabilities(&self, host: &str, report: CapabilityReport) {
        self.host_manager.update_service_capabilities(host, report);
    }

    /// The fleet view, for administrative callers.
    pub fn host_manager(&self) -> &HostManager {
        &self.host_manager
    }

    /// Place one share and return the winning host's name.
    ///
    /// `props` carries state across attempts for the same request: pass
    /// the same bag back in when retrying after a failed provision.
    pub fn schedule_create_share(
        &self,
        ctx: &RequestContext,
        spec: &RequestSpec,
        props: &mut FilterProperties,
    ) -> SchedulerResult<String> {
        let best = self.schedule(ctx, spec, props)?;
        info!(
            request_id = %ctx.request_id,
            share = share_id(spec),
            host = %best.host_state.host,
            weight = best.weight,
            "share placed"
        );
        Ok(best.host_state.host)
    }

    /// One placement attempt, yielding the full weighed winner.
    fn schedule(
        &self,
        ctx: &RequestContext,
        spec: &RequestSpec,
        props: &mut FilterProperties,
    ) -> SchedulerResult<WeighedHost> {
        if ctx.is_cancelled() {
            return Err(SchedulerError::Cancelled);
        }

        // Saved so a cancelled attempt can be rolled back without
        // counting toward the budget.
        let saved_retry = props.retry.clone();
        self.populate_retry(props, spec)?;
        self.populate_filter_properties(props, spec);

        // Fleet data is not visible under project-scoped authorization;
        // the caller's own context is kept for everything else.
        let elevated = ctx.elevated();
        let hosts = self.host_manager.snapshot(&elevated, &self.share_topic)?;

        if ctx.is_cancelled() {
            props.retry = saved_retry;
            return Err(SchedulerError::Cancelled);
        }

        // Hosts that already failed this request are never retried
        // blindly.
        let excluded: Vec<String> = props
            .retry
            .as_ref()
            .map(|r| r.hosts.clone())
            .unwrap_or_default();
        let total = hosts.len();
        let candidates: Vec<HostState> = hosts
            .into_iter()
            .filter(|h| !excluded.contains(&h.host))
            .collect();
        if candidates.len() < total {
            debug!(
                request_id = %ctx.request_id,
                dropped = total - candidates.len(),
                "excluded previously tried hosts"
            );
        }

        let filtered = self.host_manager.filter_hosts(candidates, props);
        if filtered.is_empty() {
            return Err(SchedulerError::NoValidHost(format!(
                "no host satisfies the placement request for share {}",
                share_id(spec)
            )));
        }

        let weighed = self.host_manager.weigh_hosts(filtered, props);
        let Some(best) = weighed.into_iter().next() else {
            return Err(SchedulerError::NoValidHost(format!(
                "no weighed hosts remained for share {}",
                share_id(spec)
            )));
        };

        Self::post_select_populate(props, &best);
        Ok(best)
    }

    /// Account for this attempt and enforce the retry budget.
    ///
    /// With retry disabled (`max_attempts == 1`) the properties bag never
    /// gains a `retry` entry; callers rely on its absence. The exhaustion
    /// check runs before any fleet query, so a spent request costs the
    /// registry nothing.
    fn populate_retry(
        &self,
        props: &mut FilterProperties,
        spec: &RequestSpec,
    ) -> SchedulerResult<()> {
        if self.max_attempts == 1 {
            return Ok(());
        }

        let retry = props.retry.get_or_insert_with(RetryInfo::default);
        retry.num_attempts += 1;

        if retry.num_attempts > self.max_attempts {
            warn!(
                share = share_id(spec),
                attempts = retry.num_attempts,
                tried = ?retry.hosts,
                "retry budget exhausted"
            );
            return Err(SchedulerError::NoValidHost(format!(
                "exceeded max scheduling attempts {} for share {}",
                self.max_attempts,
                share_id(spec)
            )));
        }
        Ok(())
    }

    /// Copy the request data plugins reason about into the properties
    /// bag, and refresh the operator options snapshot.
    fn populate_filter_properties(&self, props: &mut FilterProperties, spec: &RequestSpec) {
        props.size_bytes = spec.share_properties.size_bytes;
        props.project_id = Some(spec.share_properties.project_id.clone());
        props.availability_zone = spec.share_properties.availability_zone.clone();
        props
            .extra
            .insert("config_options".to_string(), self.options.current());
    }

    /// Bookkeeping after a host is chosen.
    ///
    /// Only the exclusion list grows. The winner's capacity fields are
    /// left untouched: nothing is speculatively consumed, and the next
    /// attempt re-derives capacity from a fresh snapshot.
    fn post_select_populate(props: &mut FilterProperties, winner: &WeighedHost) {
        Self::add_retry_host(props, &winner.host_state.host);
    }

    /// Record a tried host in the retry exclusion list.
    ///
    /// Append only: no dedupe, no reorder.
    fn add_retry_host(props: &mut FilterProperties, host: &str) {
        if let Some(retry) = props.retry.as_mut() {
            retry.hosts.push(host.to_string());
        }
    }
}

fn share_id(spec: &RequestSpec) -> &str {
    spec.share_ids
        .first()
        .map(String::as_str)
        .unwrap_or("<unknown>")
}
