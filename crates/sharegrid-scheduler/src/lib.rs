//! sharegrid-scheduler — share placement for the sharegrid control plane.
//!
//! Selects exactly one backend host for each share-provision request by
//! snapshotting the registered fleet, filtering candidates through
//! pluggable predicates, and ranking the survivors with weighted scoring.
//! Placement is bounded and stateful: a failed provision can be retried
//! with the same `FilterProperties`, and the scheduler walks past hosts
//! it already tried for that request.
//!
//! # Architecture
//!
//! ```text
//! FilterScheduler
//!   ├── HostManager
//!   │   ├── ServiceCatalog (registry read: who exists, zone, liveness)
//!   │   ├── capability map (latest CapabilityReport per host)
//!   │   ├── filter chain (AvailabilityZoneFilter, CapacityFilter, ...)
//!   │   └── weigher chain (CapacityWeigher, ...)
//!   ├── SchedulerOptions (lazily reloaded tunables file)
//!   └── retry bookkeeping in caller-owned FilterProperties
//!
//! ChanceScheduler
//!   └── ServiceCatalog (uniform-random pick over live hosts)
//! ```

pub mod chance;
pub mod config;
pub mod context;
pub mod error;
pub mod filters;
pub mod hosts;
pub mod options;
pub mod request;
pub mod scheduler;
pub mod weights;

pub use chance::ChanceScheduler;
pub use config::SchedulerConfig;
pub use context::RequestContext;
pub use error::{SchedulerError, SchedulerResult};
pub use filters::{AvailabilityZoneFilter, CapacityFilter, HostFilter};
pub use hosts::{CapabilityReport, HostManager, HostState};
pub use options::SchedulerOptions;
pub use request::{FilterProperties, RequestSpec, RetryInfo, ShareProperties};
pub use scheduler::FilterScheduler;
pub use weights::{CapacityWeigher, HostWeigher, WeighedHost};
