use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Serialized picture of an object graph.
///
/// Classes are referenced by qualified name (`namespace.Name`, or just `Name`
/// for classes without a namespace), objects by their `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HeapSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub classes: Vec<ClassDecl>,

    #[serde(default)]
    pub objects: Vec<ObjectDecl>,

    /// Values the analysis starts from
    #[serde(default)]
    pub roots: Vec<SnapshotValue>,
}

fn default_schema_version() -> u32 {
    crate::SNAPSHOT_SCHEMA_VERSION
}

impl Default for HeapSnapshot {
    fn default() -> Self {
        Self {
            schema_version: crate::SNAPSHOT_SCHEMA_VERSION,
            classes: Vec::new(),
            objects: Vec::new(),
            roots: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClassDecl {
    pub name: String,

    /// Dotted namespace path; absent when the declaring namespace is unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Direct bases by qualified name, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<String>,
}

impl ClassDecl {
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectDecl {
    pub id: String,

    /// Qualified class name
    pub class: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, SnapshotValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotValue {
    /// Reference to an object by id
    Ref(String),
    List(Vec<SnapshotValue>),
    /// Key/value entries
    Map(Vec<(SnapshotValue, SnapshotValue)>),
    Set(Vec<SnapshotValue>),
    Scalar(serde_json::Value),
}

impl HeapSnapshot {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(raw).context("invalid heap snapshot JSON")?;
        if snapshot.schema_version != crate::SNAPSHOT_SCHEMA_VERSION {
            anyhow::bail!(
                "unsupported snapshot schema version {} (expected {})",
                snapshot.schema_version,
                crate::SNAPSHOT_SCHEMA_VERSION
            );
        }
        Ok(snapshot)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("while loading {}", path.display()))
    }
}
