//! redb table definitions for the sharegrid registry store.
//!
//! One table, `&str` keys and `&[u8]` values (JSON-serialized records).
//! The `{topic}/{host}` composite key makes per-topic fleet queries a
//! prefix scan.

use redb::TableDefinition;

/// Service-registry records keyed by `{topic}/{host}`.
pub const SERVICES: TableDefinition<&str, &[u8]> = TableDefinition::new("services");
