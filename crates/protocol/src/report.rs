use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Serialized class relation map, one entry per key class in qualified-name order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RelationReport {
    pub classes: Vec<ClassEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClassEntry {
    /// Qualified class name
    pub class: String,

    #[serde(default)]
    pub aggregations: Vec<AggregationEntry>,

    /// Qualified names of the recorded superclasses
    #[serde(default)]
    pub inherits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AggregationEntry {
    pub target: String,
    pub attribute: String,
    pub multiplicity: MultiplicityKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MultiplicityKind {
    Single,
    Multiple,
}

impl RelationReport {
    pub fn class(&self, qualified_name: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|entry| entry.class == qualified_name)
    }

    pub fn relation_count(&self) -> usize {
        self.classes
            .iter()
            .map(|entry| entry.aggregations.len() + entry.inherits.len())
            .sum()
    }
}
