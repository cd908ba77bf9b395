//! Wire formats shared by the relmap crates.
//!
//! - [`snapshot`]: the heap snapshot a caller hands to the analyzer (classes, objects, roots)
//! - [`report`]: the serialized class relation map produced by an analysis

use anyhow::Result;
use serde::Serialize;

pub mod report;
pub mod snapshot;

pub use report::{AggregationEntry, ClassEntry, MultiplicityKind, RelationReport};
pub use snapshot::{ClassDecl, HeapSnapshot, ObjectDecl, SnapshotValue};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// JSON schema of the snapshot input format
pub fn snapshot_schema() -> Result<String> {
    let schema = schemars::schema_for!(HeapSnapshot);
    serialize_json_pretty(&schema)
}
