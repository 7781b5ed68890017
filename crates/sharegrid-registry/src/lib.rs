//! sharegrid-registry — service registration and liveness for sharegrid.
//!
//! Backend hosts register themselves under a topic (one per service class,
//! e.g. `"share"`), send periodic heartbeats, and can be administratively
//! disabled. The scheduler consumes the fleet through the read-only
//! [`ServiceCatalog`] trait and never writes registry state.
//!
//! # Architecture
//!
//! ```text
//! Backend host
//!   ├── register() → upserts ServiceRecord, stamps heartbeat
//!   └── heartbeat() → refreshes last-seen timestamp
//!
//! Operator
//!   ├── set_disabled() → takes a host out of scheduling
//!   └── service_status() → Up / Down / Disabled view
//!
//! Scheduler
//!   └── ServiceCatalog::list_services(topic) → raw records; the
//!       consumer applies its own liveness policy
//! ```

pub mod catalog;
pub mod error;
pub mod manager;

pub use catalog::ServiceCatalog;
pub use error::{RegistryError, RegistryResult};
pub use manager::{RegistryManager, ServiceStatus};
