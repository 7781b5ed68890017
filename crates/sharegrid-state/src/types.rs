//! Domain types for the sharegrid registry store.
//!
//! A [`ServiceRecord`] is the registry's view of one backend host: which
//! topic it serves, which availability zone it sits in, whether an operator
//! has withdrawn it, and when it last heartbeated. The placement layer only
//! ever reads these; the registry owns all writes.

use serde::{Deserialize, Serialize};

/// Unique name of a backend host within a topic.
pub type HostName = String;

/// Service-registry record for one backend host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceRecord {
    pub host: HostName,
    /// Service-class key (e.g. `"share"`) that scopes fleet queries.
    pub topic: String,
    pub availability_zone: String,
    /// Administratively withdrawn from placement when true.
    pub disabled: bool,
    /// Unix timestamp (seconds) of the last heartbeat.
    pub last_heartbeat: u64,
}

impl ServiceRecord {
    /// Build the composite key for the services table.
    pub fn table_key(&self) -> String {
        format!("{}/{}", self.topic, self.host)
    }

    /// Whether the record's heartbeat is recent enough to count as up.
    ///
    /// A host whose last heartbeat is older than `down_threshold_secs`
    /// is down regardless of its `disabled` flag.
    pub fn is_up(&self, now_secs: u64, down_threshold_secs: u64) -> bool {
        now_secs.saturating_sub(self.last_heartbeat) <= down_threshold_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(host: &str, heartbeat: u64) -> ServiceRecord {
        ServiceRecord {
            host: host.to_string(),
            topic: "share".to_string(),
            availability_zone: "zone1".to_string(),
            disabled: false,
            last_heartbeat: heartbeat,
        }
    }

    #[test]
    fn table_key_is_topic_scoped() {
        assert_eq!(record("backend-a", 0).table_key(), "share/backend-a");
    }

    #[test]
    fn fresh_heartbeat_is_up() {
        let rec = record("backend-a", 1_000);
        assert!(rec.is_up(1_030, 60));
    }

    #[test]
    fn stale_heartbeat_is_down() {
        let rec = record("backend-a", 1_000);
        assert!(!rec.is_up(1_061, 60));
    }

    #[test]
    fn clock_skew_does_not_underflow() {
        // A heartbeat stamped ahead of the reader's clock still counts as up.
        let rec = record("backend-a", 2_000);
        assert!(rec.is_up(1_000, 60));
    }
}
