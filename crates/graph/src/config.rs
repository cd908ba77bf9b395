use crate::error::{GraphError, Result};
use crate::inheritance::InheritanceDiscovery;
use crate::walker::STRUCTURAL_MEMBERS;
use serde::{Deserialize, Serialize};

/// Configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Dotted namespace whose classes are analyzed (sub-namespaces included)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_namespace: Option<String>,

    /// Qualified names of classes to strip from the result
    pub excluded: Vec<String>,

    /// Member names never followed
    pub ignored_members: Vec<String>,

    /// Ancestor discovery mode for inheritance edges
    pub inheritance: InheritanceDiscovery,

    /// Upper bound on visited objects (None = unbounded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_objects: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            target_namespace: None,
            excluded: Vec::new(),
            ignored_members: STRUCTURAL_MEMBERS.iter().map(|m| m.to_string()).collect(),
            inheritance: InheritanceDiscovery::FullChain,
            max_objects: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        Self {
            target_namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    /// Only direct parents are linked, with a visit budget for large heaps
    pub fn shallow(namespace: impl Into<String>) -> Self {
        Self {
            inheritance: InheritanceDiscovery::ImmediateParents,
            max_objects: Some(100_000),
            ..Self::for_namespace(namespace)
        }
    }

    pub fn exclude(mut self, qualified_name: impl Into<String>) -> Self {
        self.excluded.push(qualified_name.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ns) = &self.target_namespace {
            let ns = ns.trim();
            if ns.is_empty() || ns.starts_with('.') || ns.ends_with('.') || ns.contains("..") {
                return Err(GraphError::InvalidConfig(format!(
                    "target_namespace {ns:?} is not a dotted namespace path"
                )));
            }
        }
        if self.max_objects == Some(0) {
            return Err(GraphError::InvalidConfig(
                "max_objects must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
