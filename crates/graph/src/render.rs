//! Graph form of a [`ClassRelationMap`] for diagram renderers.

use crate::class::Class;
use crate::types::{ClassRelationMap, Multiplicity, Relation};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    pub class: Class,

    /// False for classes that only appear as relation targets
    pub is_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationEdge {
    Aggregation {
        attribute: String,
        multiplicity: Multiplicity,
    },
    Inheritance,
}

/// Directed class graph: one node per class, one edge per relation
pub struct RelationGraph {
    pub graph: DiGraph<ClassNode, RelationEdge>,

    /// Qualified class name -> node
    pub class_index: HashMap<String, NodeIndex>,
}

impl RelationGraph {
    pub fn from_relations(relations: &ClassRelationMap) -> Self {
        let mut graph = RelationGraph {
            graph: DiGraph::new(),
            class_index: HashMap::new(),
        };

        for class in relations.classes() {
            let idx = graph.node_for(class);
            graph.graph[idx].is_key = true;
        }

        for relation in relations.relations() {
            let from = graph.node_for(relation.source());
            let to = graph.node_for(relation.target());
            let edge = match relation {
                Relation::Aggregation(rel) => RelationEdge::Aggregation {
                    attribute: rel.attribute.clone(),
                    multiplicity: rel.multiplicity,
                },
                Relation::Inheritance(_) => RelationEdge::Inheritance,
            };
            graph.graph.add_edge(from, to, edge);
        }

        graph
    }

    fn node_for(&mut self, class: &Class) -> NodeIndex {
        if let Some(&idx) = self.class_index.get(class.qualified_name()) {
            return idx;
        }
        let idx = self.graph.add_node(ClassNode {
            class: class.clone(),
            is_key: false,
        });
        self.class_index.insert(class.qualified_name().to_string(), idx);
        idx
    }

    pub fn find_node(&self, qualified_name: &str) -> Option<NodeIndex> {
        self.class_index.get(qualified_name).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Graphviz source: boxes, top-to-bottom, hollow diamonds for
    /// aggregations and hollow arrowheads for inheritance.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph ClassRelations {\n");
        dot.push_str("  rankdir=TB;\n");
        dot.push_str("  node [shape=box];\n\n");

        // Node indices follow insertion order, which is sorted by class name for keys.
        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            let _ = writeln!(
                dot,
                "  \"{}\" [label=\"{}\"];",
                escape(node.class.qualified_name()),
                escape(node.class.name())
            );
        }

        dot.push('\n');

        for edge in self.graph.edge_references() {
            let from = escape(self.graph[edge.source()].class.qualified_name());
            let to = escape(self.graph[edge.target()].class.qualified_name());
            let _ = match edge.weight() {
                RelationEdge::Aggregation {
                    attribute,
                    multiplicity,
                } => {
                    let suffix = match multiplicity {
                        Multiplicity::Single => "",
                        Multiplicity::Multiple => "[*]",
                    };
                    writeln!(
                        dot,
                        "  \"{from}\" -> \"{to}\" [arrowhead=odiamond, label=\"{}{suffix}\"];",
                        escape(attribute)
                    )
                }
                RelationEdge::Inheritance => {
                    writeln!(dot, "  \"{from}\" -> \"{to}\" [arrowhead=empty];")
                }
            };
        }

        dot.push_str("}\n");
        dot
    }
}

impl ClassRelationMap {
    pub fn to_dot(&self) -> String {
        RelationGraph::from_relations(self).to_dot()
    }
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
