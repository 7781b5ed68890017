//! sharegrid-state — embedded registry store for sharegrid.
//!
//! Backed by [redb](https://docs.rs/redb), holds the service-registry
//! records the placement layer reads: one [`ServiceRecord`] per backend
//! host per topic.
//!
//! # Architecture
//!
//! Records are JSON-serialized into redb's `&[u8]` value column under
//! composite `{topic}/{host}` keys, so a fleet query for one topic is a
//! single prefix scan.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared freely between the registry write path and concurrent
//! scheduler reads.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::StateStore;
pub use types::*;
