use crate::class::Class;
use crate::types::InheritanceRelation;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How far up the hierarchy ancestor classes are pulled into the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceDiscovery {
    /// The whole linearized ancestor chain of every analyzed class
    #[default]
    FullChain,

    /// Only the direct bases; grandparents appear only if analyzed themselves
    ImmediateParents,
}

/// Minimal superclass edges among `classes` and the ancestors they pull in.
///
/// An edge `N1 -> N2` is left out whenever an edge `N1 -> X` with `X` a
/// subclass of `N2` is already recorded. Ancestors are tried in
/// linearization order, so the earlier of two equally specific ancestors
/// takes precedence.
pub fn build_inheritance(
    classes: &BTreeSet<Class>,
    discovery: InheritanceDiscovery,
) -> BTreeMap<Class, BTreeSet<InheritanceRelation>> {
    let mut recorded: BTreeMap<Class, Vec<Class>> = BTreeMap::new();
    let mut discovered: BTreeSet<Class> = BTreeSet::new();

    for class in classes {
        let candidates = match discovery {
            InheritanceDiscovery::FullChain => class.ancestors(),
            InheritanceDiscovery::ImmediateParents => class.bases(),
        };

        let edges = recorded.entry(class.clone()).or_default();
        for ancestor in candidates {
            if !classes.contains(ancestor) {
                discovered.insert(ancestor.clone());
            }
            if !is_covered(edges, ancestor) {
                edges.push(ancestor.clone());
            }
        }
    }

    if !discovered.is_empty() {
        log::debug!(
            "Inheritance discovery pulled in {} ancestor classes",
            discovered.len()
        );
    }

    let mut working = classes.clone();
    working.extend(discovered);

    for class in &working {
        let edges = recorded.entry(class.clone()).or_default();
        for ancestor in class.ancestors() {
            if working.contains(ancestor) && !is_covered(edges, ancestor) {
                edges.push(ancestor.clone());
            }
        }
    }

    recorded
        .into_iter()
        .filter(|(_, edges)| !edges.is_empty())
        .map(|(subclass, edges)| {
            let relations = edges
                .into_iter()
                .map(|superclass| InheritanceRelation {
                    subclass: subclass.clone(),
                    superclass,
                })
                .collect();
            (subclass, relations)
        })
        .collect()
}

/// Whether an already recorded edge implies `ancestor` by transitivity
fn is_covered(edges: &[Class], ancestor: &Class) -> bool {
    edges.iter().any(|recorded| recorded.is_subclass_of(ancestor))
}
