//! Host weighers — scoring and ranking of filtered candidates.

use std::fmt;

use crate::error::{SchedulerError, SchedulerResult};
use crate::hosts::HostState;
use crate::request::FilterProperties;

/// A scored candidate host. Ephemeral ranking result, never persisted.
#[derive(Debug, Clone)]
pub struct WeighedHost {
    pub host_state: HostState,
    /// Composite score, higher is better.
    pub weight: f64,
}

/// Scores one host for one request.
///
/// Scores from different weighers combine as `multiplier() * weigh()`
/// summed per host. Weighers are pure and must not block.
pub trait HostWeigher: Send + Sync {
    /// Name used to select this weigher in configuration.
    fn name(&self) -> &'static str;

    /// Scale factor applied to this weigher's scores.
    fn multiplier(&self) -> f64 {
        1.0
    }

    /// Score for one host; higher is better.
    fn weigh(&self, host: &HostState, props: &FilterProperties) -> f64;
}

impl fmt::Debug for dyn HostWeigher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostWeigher({})", self.name())
    }
}

/// Resolve configured weigher names against the built-in set.
pub fn resolve(names: &[String]) -> SchedulerResult<Vec<Box<dyn HostWeigher>>> {
    names
        .iter()
        .map(|name| match name.as_str() {
            "capacity" => Ok(Box::new(CapacityWeigher) as Box<dyn HostWeigher>),
            other => Err(SchedulerError::WeigherNotFound(other.to_string())),
        })
        .collect()
}

/// Score all hosts and return them best first.
///
/// Ties are broken by host name ascending, so identical fleets produce
/// identical placements run after run.
pub fn rank_hosts(
    hosts: Vec<HostState>,
    weighers: &[Box<dyn HostWeigher>],
    props: &FilterProperties,
) -> Vec<WeighedHost> {
    let mut weighed: Vec<WeighedHost> = hosts
        .into_iter()
        .map(|host_state| {
            let weight = weighers
                .iter()
                .map(|w| w.multiplier() * w.weigh(&host_state, props))
                .sum();
            WeighedHost { host_state, weight }
        })
        .collect();

    weighed.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.host_state.host.cmp(&b.host_state.host))
    });
    weighed
}

/// Scores hosts by usable capacity, spreading shares onto the emptiest
/// backends.
pub struct CapacityWeigher;

impl HostWeigher for CapacityWeigher {
    fn name(&self) -> &'static str {
        "capacity"
    }

    fn weigh(&self, host: &HostState, _props: &FilterProperties) -> f64 {
        host.usable_capacity_bytes() as f64
    }
}
