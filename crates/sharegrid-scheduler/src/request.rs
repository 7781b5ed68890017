//! Request types threaded through one placement.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// What the caller wants provisioned. Read-only for the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSpec {
    pub share_properties: ShareProperties,
    pub share_type_name: String,
    pub share_ids: Vec<String>,
}

/// Properties of the share being placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareProperties {
    pub project_id: String,
    pub size_bytes: u64,
    /// Zone constraint; `None` accepts any zone.
    pub availability_zone: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// Mutable request state owned by the caller and threaded through every
/// attempt for one request.
///
/// The scheduler populates the typed fields from the request spec and
/// records retry bookkeeping in `retry`; filters and weighers may stash
/// private keys in `extra`, which the core never interprets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterProperties {
    /// Retry bookkeeping. Absent while untouched, and kept absent
    /// entirely when retry is disabled (`max_attempts == 1`).
    pub retry: Option<RetryInfo>,
    pub availability_zone: Option<String>,
    pub project_id: Option<String>,
    pub size_bytes: u64,
    /// Plugin-private keys, opaque to the core.
    pub extra: HashMap<String, serde_json::Value>,
}

/// Attempt count and exclusion list accumulated across retries of one
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryInfo {
    /// Attempts made so far, the current one included.
    pub num_attempts: u32,
    /// Hosts already tried for this request, in selection order.
    pub hosts: Vec<String>,
}
