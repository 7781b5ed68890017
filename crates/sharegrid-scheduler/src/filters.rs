//! Host filters — boolean predicates over candidate hosts.
//!
//! Filters run in configuration order with AND semantics: a host stays a
//! candidate only while every filter accepts it. They are pure functions
//! of the host view and request properties; no filter may block or
//! perform I/O, since the chain runs once per attempt across the whole
//! fleet.

use std::fmt;

use tracing::{debug, warn};

use crate::error::{SchedulerError, SchedulerResult};
use crate::hosts::HostState;
use crate::request::FilterProperties;

/// A predicate deciding whether one host can serve one request.
pub trait HostFilter: Send + Sync {
    /// Name used to select this filter in configuration.
    fn name(&self) -> &'static str;

    /// Whether the host remains a candidate for this request.
    fn passes(&self, host: &HostState, props: &FilterProperties) -> bool;
}

impl fmt::Debug for dyn HostFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostFilter({})", self.name())
    }
}

/// Resolve configured filter names against the built-in set.
pub fn resolve(names: &[String]) -> SchedulerResult<Vec<Box<dyn HostFilter>>> {
    names
        .iter()
        .map(|name| match name.as_str() {
            "availability_zone" => Ok(Box::new(AvailabilityZoneFilter) as Box<dyn HostFilter>),
            "capacity" => Ok(Box::new(CapacityFilter) as Box<dyn HostFilter>),
            other => Err(SchedulerError::FilterNotFound(other.to_string())),
        })
        .collect()
}

/// Apply a filter chain in order, keeping the hosts every filter accepts.
///
/// An empty chain is an identity pass-through.
pub fn apply_filters(
    hosts: Vec<HostState>,
    filters: &[Box<dyn HostFilter>],
    props: &FilterProperties,
) -> Vec<HostState> {
    let mut survivors = hosts;
    for filter in filters {
        let before = survivors.len();
        survivors.retain(|host| filter.passes(host, props));
        if survivors.len() < before {
            debug!(
                filter = filter.name(),
                before,
                after = survivors.len(),
                "filter pruned hosts"
            );
        }
        if survivors.is_empty() {
            warn!(filter = filter.name(), "filter eliminated all remaining hosts");
            break;
        }
    }
    survivors
}

/// Passes hosts in the request's availability zone.
///
/// Requests that name no zone accept every host.
pub struct AvailabilityZoneFilter;

impl HostFilter for AvailabilityZoneFilter {
    fn name(&self) -> &'static str {
        "availability_zone"
    }

    fn passes(&self, host: &HostState, props: &FilterProperties) -> bool {
        match &props.availability_zone {
            Some(zone) => host.availability_zone == *zone,
            None => true,
        }
    }
}

/// Passes hosts whose usable capacity covers the requested size.
///
/// A host that has never reported capabilities has unknown capacity and
/// is rejected outright.
pub struct CapacityFilter;

impl HostFilter for CapacityFilter {
    fn name(&self) -> &'static str {
        "capacity"
    }

    fn passes(&self, host: &HostState, props: &FilterProperties) -> bool {
        if host.last_updated == 0 {
            debug!(host = %host.host, "no capability report yet");
            return false;
        }
        let usable = host.usable_capacity_bytes();
        if usable < props.size_bytes {
            debug!(
                host = %host.host,
                usable,
                requested = props.size_bytes,
                "insufficient capacity"
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn host(name: &str, zone: &str, total_gib: u64, free_gib: u64) -> HostState {
        HostState {
            host: name.to_string(),
            total_capacity_bytes: total_gib * GIB,
            free_capacity_bytes: free_gib * GIB,
            reserved_percentage: 0,
            availability_zone: zone.to_string(),
            last_updated: 1_000,
            pool_info: serde_json::Value::Null,
        }
    }

    #[test]
    fn resolve_rejects_unknown_name() {
        let err = resolve(&["no_such_filter".to_string()]).unwrap_err();
        assert!(matches!(err, SchedulerError::FilterNotFound(name) if name == "no_such_filter"));
    }

    #[test]
    fn resolve_preserves_order() {
        let filters = resolve(&[
            "capacity".to_string(),
            "availability_zone".to_string(),
        ])
        .unwrap();
        assert_eq!(filters[0].name(), "capacity");
        assert_eq!(filters[1].name(), "availability_zone");
    }

    #[test]
    fn zone_filter_accepts_all_without_constraint() {
        let props = FilterProperties::default();
        assert!(AvailabilityZoneFilter.passes(&host("h1", "zone1", 10, 10), &props));
        assert!(AvailabilityZoneFilter.passes(&host("h2", "zone2", 10, 10), &props));
    }

    #[test]
    fn zone_filter_matches_requested_zone() {
        let props = FilterProperties {
            availability_zone: Some("zone2".to_string()),
            ..Default::default()
        };
        assert!(!AvailabilityZoneFilter.passes(&host("h1", "zone1", 10, 10), &props));
        assert!(AvailabilityZoneFilter.passes(&host("h2", "zone2", 10, 10), &props));
    }

    #[test]
    fn capacity_filter_rejects_unreported_host() {
        let mut unreported = host("h1", "zone1", 0, 0);
        unreported.last_updated = 0;
        let props = FilterProperties::default();

        assert!(!CapacityFilter.passes(&unreported, &props));
    }

    #[test]
    fn capacity_filter_checks_usable_space() {
        let props = FilterProperties {
            size_bytes: 5 * GIB,
            ..Default::default()
        };
        assert!(CapacityFilter.passes(&host("h1", "zone1", 10, 6), &props));
        assert!(!CapacityFilter.passes(&host("h2", "zone1", 10, 4), &props));
    }

    #[test]
    fn capacity_filter_honors_reservation() {
        // 10 GiB free, but 20% of 100 GiB total is held back.
        let mut reserved = host("h1", "zone1", 100, 10);
        reserved.reserved_percentage = 20;
        let props = FilterProperties {
            size_bytes: GIB,
            ..Default::default()
        };

        assert!(!CapacityFilter.passes(&reserved, &props));
    }

    #[test]
    fn empty_chain_is_identity() {
        let hosts = vec![host("h1", "zone1", 10, 10), host("h2", "zone2", 10, 10)];
        let props = FilterProperties::default();

        let survivors = apply_filters(hosts.clone(), &[], &props);
        assert_eq!(survivors.len(), hosts.len());
    }

    #[test]
    fn chain_applies_every_filter() {
        let hosts = vec![
            host("h1", "zone1", 10, 10),
            host("h2", "zone2", 10, 10),
            host("h3", "zone2", 10, 1),
        ];
        let props = FilterProperties {
            availability_zone: Some("zone2".to_string()),
            size_bytes: 5 * GIB,
            ..Default::default()
        };
        let filters = resolve(&[
            "availability_zone".to_string(),
            "capacity".to_string(),
        ])
        .unwrap();

        let survivors = apply_filters(hosts, &filters, &props);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].host, "h2");
    }
}
