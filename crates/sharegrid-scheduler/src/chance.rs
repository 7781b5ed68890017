//! Chance scheduler — uniform-random placement.
//!
//! An alternative driver for deployments that want plain load spread
//! without capability-based ranking. It honors the same fleet rules as
//! the filter scheduler (live, enabled hosts only; the retry exclusion
//! list is respected when present) but picks uniformly at random and
//! keeps no retry bookkeeping of its own.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::seq::SliceRandom;
use tracing::info;

use sharegrid_registry::ServiceCatalog;

use crate::config::SchedulerConfig;
use crate::context::RequestContext;
use crate::error::{SchedulerError, SchedulerResult};
use crate::request::{FilterProperties, RequestSpec};

/// Places shares on a random live host.
pub struct ChanceScheduler {
    catalog: Arc<dyn ServiceCatalog>,
    share_topic: String,
    service_down_time: Duration,
}

impl ChanceScheduler {
    /// Create a scheduler from deployment configuration.
    pub fn new(config: &SchedulerConfig, catalog: Arc<dyn ServiceCatalog>) -> Self {
        Self {
            catalog,
            share_topic: config.share_topic.clone(),
            service_down_time: Duration::from_secs(config.service_down_time_secs),
        }
    }

    /// Pick a live host uniformly at random.
    pub fn schedule_create_share(
        &self,
        ctx: &RequestContext,
        spec: &RequestSpec,
        props: &FilterProperties,
    ) -> SchedulerResult<String> {
        if ctx.is_cancelled() {
            return Err(SchedulerError::Cancelled);
        }

        let candidates = self.live_hosts(props)?;
        let Some(host) = candidates.choose(&mut rand::thread_rng()) else {
            let share_id = spec
                .share_ids
                .first()
                .map(String::as_str)
                .unwrap_or("<unknown>");
            return Err(SchedulerError::NoValidHost(format!(
                "no hosts available for share {share_id}"
            )));
        };

        info!(request_id = %ctx.request_id, %host, "share placed at random");
        Ok(host.clone())
    }

    /// Live, enabled, non-excluded hosts for the configured topic.
    fn live_hosts(&self, props: &FilterProperties) -> SchedulerResult<Vec<String>> {
        let records = self.catalog.list_services(&self.share_topic)?;
        let now = epoch_secs();
        let excluded: &[String] = props
            .retry
            .as_ref()
            .map(|r| r.hosts.as_slice())
            .unwrap_or(&[]);

        Ok(records
            .into_iter()
            .filter(|r| !r.disabled && r.is_up(now, self.service_down_time.as_secs()))
            .map(|r| r.host)
            .filter(|host| !excluded.contains(host))
            .collect())
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use sharegrid_registry::RegistryResult;
    use sharegrid_state::ServiceRecord;

    use crate::request::{RetryInfo, ShareProperties};

    struct StaticCatalog {
        records: Vec<ServiceRecord>,
    }

    impl ServiceCatalog for StaticCatalog {
        fn list_services(&self, topic: &str) -> RegistryResult<Vec<ServiceRecord>> {
            Ok(self
                .records
                .iter()
                .filter(|r| r.topic == topic)
                .cloned()
                .collect())
        }
    }

    fn service(host: &str) -> ServiceRecord {
        ServiceRecord {
            host: host.to_string(),
            topic: "share".to_string(),
            availability_zone: "zone1".to_string(),
            disabled: false,
            last_heartbeat: epoch_secs(),
        }
    }

    fn request() -> RequestSpec {
        RequestSpec {
            share_properties: ShareProperties {
                project_id: "proj-1".to_string(),
                size_bytes: 1024,
                availability_zone: None,
                metadata: HashMap::new(),
            },
            share_type_name: "default".to_string(),
            share_ids: vec!["share-1".to_string()],
        }
    }

    fn scheduler(records: Vec<ServiceRecord>) -> ChanceScheduler {
        ChanceScheduler::new(
            &SchedulerConfig::default(),
            Arc::new(StaticCatalog { records }),
        )
    }

    #[test]
    fn picks_only_live_enabled_hosts() {
        let mut disabled = service("host2");
        disabled.disabled = true;
        let mut down = service("host3");
        down.last_heartbeat = 1_000;

        let scheduler = scheduler(vec![service("host1"), disabled, down]);
        let ctx = RequestContext::new("alice", "proj-1");
        let props = FilterProperties::default();

        for _ in 0..20 {
            let host = scheduler
                .schedule_create_share(&ctx, &request(), &props)
                .unwrap();
            assert_eq!(host, "host1");
        }
    }

    #[test]
    fn honors_retry_exclusion_list() {
        let scheduler = scheduler(vec![
            service("host1"),
            service("host2"),
            service("host3"),
        ]);
        let ctx = RequestContext::new("alice", "proj-1");
        let props = FilterProperties {
            retry: Some(RetryInfo {
                num_attempts: 2,
                hosts: vec!["host1".to_string(), "host3".to_string()],
            }),
            ..Default::default()
        };

        for _ in 0..20 {
            let host = scheduler
                .schedule_create_share(&ctx, &request(), &props)
                .unwrap();
            assert_eq!(host, "host2");
        }
        // The exclusion list is read, never written.
        assert_eq!(props.retry.unwrap().hosts.len(), 2);
    }

    #[test]
    fn empty_fleet_is_no_valid_host() {
        let scheduler = scheduler(vec![]);
        let ctx = RequestContext::new("alice", "proj-1");
        let props = FilterProperties::default();

        let err = scheduler
            .schedule_create_share(&ctx, &request(), &props)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::NoValidHost(_)));
    }

    #[test]
    fn random_pick_stays_within_fleet() {
        let scheduler = scheduler(vec![
            service("host1"),
            service("host2"),
            service("host3"),
        ]);
        let ctx = RequestContext::new("alice", "proj-1");
        let props = FilterProperties::default();

        for _ in 0..20 {
            let host = scheduler
                .schedule_create_share(&ctx, &request(), &props)
                .unwrap();
            assert!(["host1", "host2", "host3"].contains(&host.as_str()));
        }
    }
}
