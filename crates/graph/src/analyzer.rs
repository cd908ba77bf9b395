use crate::class::Class;
use crate::config::AnalyzerConfig;
use crate::error::{GraphError, Result};
use crate::exclusion::exclude;
use crate::inheritance::build_inheritance;
use crate::membership::{Membership, NamespacePrefix};
use crate::space::ObjectSpace;
use crate::types::{ClassRelationMap, Relation};
use crate::value::Value;
use crate::walker::{GraphWalker, MemberFilter};
use std::collections::BTreeSet;

/// Derives class-level aggregation and inheritance relations from an object graph.
///
/// Each call to [`analyze`](Self::analyze) is an independent snapshot: nothing
/// is kept between runs.
pub struct RelationAnalyzer<M: Membership> {
    membership: M,
    config: AnalyzerConfig,
}

/// Output of one analysis
#[derive(Debug, Clone)]
pub struct Analysis {
    pub relations: ClassRelationMap,
    pub stats: AnalysisStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    pub objects_visited: usize,
    pub classes: usize,
    pub aggregation_relations: usize,
    pub inheritance_relations: usize,
}

impl RelationAnalyzer<NamespacePrefix> {
    /// Analyzer for the namespace named in `config.target_namespace`
    pub fn from_config(config: AnalyzerConfig) -> Result<Self> {
        let namespace = config.target_namespace.clone().ok_or_else(|| {
            GraphError::InvalidConfig("target_namespace is required".to_string())
        })?;
        Self::new(NamespacePrefix::new(namespace.trim()), config)
    }
}

impl<M: Membership> RelationAnalyzer<M> {
    pub fn new(membership: M, config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { membership, config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Walk `roots`, add inheritance edges, then strip `exclusions` and the
    /// classes named in the configuration.
    pub fn analyze<S>(
        &self,
        space: &S,
        roots: &[Value<S::Handle>],
        exclusions: &BTreeSet<Class>,
    ) -> Result<Analysis>
    where
        S: ObjectSpace + ?Sized,
    {
        let outcome = GraphWalker::new(space, &self.membership)
            .with_filter(MemberFilter::new(self.config.ignored_members.iter().cloned()))
            .with_max_objects(self.config.max_objects)
            .walk(roots)?;
        let mut relations = outcome.relations;

        let mut classes: BTreeSet<Class> = relations.classes().cloned().collect();
        classes.extend(relations.aggregation_targets());

        for (class, edges) in build_inheritance(&classes, self.config.inheritance) {
            relations.seed(&class);
            for edge in edges {
                relations.insert_inheritance(edge);
            }
        }

        let excluded = self.resolve_exclusions(&relations, exclusions);
        let relations = exclude(relations, &excluded);

        let stats = AnalysisStats {
            objects_visited: outcome.visited.len(),
            classes: relations.class_count(),
            aggregation_relations: relations
                .relations()
                .filter(|rel| matches!(rel, Relation::Aggregation(_)))
                .count(),
            inheritance_relations: relations
                .relations()
                .filter(|rel| matches!(rel, Relation::Inheritance(_)))
                .count(),
        };

        log::info!(
            "Analyzed object graph: {} objects, {} classes, {} aggregations, {} inheritance edges",
            stats.objects_visited,
            stats.classes,
            stats.aggregation_relations,
            stats.inheritance_relations
        );

        Ok(Analysis { relations, stats })
    }

    /// Explicit exclusions plus configured names that match a class in the result
    fn resolve_exclusions(
        &self,
        relations: &ClassRelationMap,
        exclusions: &BTreeSet<Class>,
    ) -> BTreeSet<Class> {
        let mut excluded = exclusions.clone();
        if self.config.excluded.is_empty() {
            return excluded;
        }

        let known = relations.all_classes();
        for name in &self.config.excluded {
            match known.iter().find(|class| class.qualified_name() == name) {
                Some(class) => {
                    excluded.insert(class.clone());
                }
                None => log::debug!("Exclusion {name} matches no analyzed class"),
            }
        }
        excluded
    }
}
