//! # Relmap Graph
//!
//! Class relations recovered from a live object graph.
//!
//! ## Features
//!
//! - **Aggregation discovery** - which class holds which, through which attribute, once or many times
//! - **Inheritance edges** - minimal superclass edges, ancestors outside the target pulled in as needed
//! - **Exclusion** - strip classes and everything pointing at them
//! - **Rendering** - petgraph view and Graphviz source of the result
//!
//! ## Architecture
//!
//! ```text
//! roots: Value[]
//!     │
//!     ├──> Graph Walker (identity visited-set)
//!     │      ├─ Membership oracle (namespace prefix)
//!     │      ├─ Container flattener (sequence, mapping, set)
//!     │      └─ Aggregation relations by class
//!     │
//!     ├──> Inheritance builder
//!     │      └─ Minimal superclass edges over the classes seen
//!     │
//!     ├──> Exclusion filter
//!     │
//!     └──> ClassRelationMap ──> RelationGraph (petgraph) ──> DOT
//! ```
//!
//! ## Example
//!
//! ```rust
//! use relmap_graph::{AnalyzerConfig, Class, Heap, RelationAnalyzer, Value};
//! use std::collections::BTreeSet;
//!
//! let parent = Class::root("Parent", Some("app"));
//! let child = Class::new("Child", Some("app"), vec![parent.clone()]).unwrap();
//!
//! let mut heap = Heap::new();
//! let p = heap.add_object(&parent);
//! let c = heap.add_object(&child);
//! heap.set_attr(p, "child", Value::Object(c)).unwrap();
//!
//! let analyzer = RelationAnalyzer::from_config(AnalyzerConfig::for_namespace("app")).unwrap();
//! let analysis = analyzer.analyze(&heap, &[Value::Object(p)], &BTreeSet::new()).unwrap();
//! println!("{}", analysis.relations.to_dot());
//! ```

mod analyzer;
mod class;
mod config;
mod container;
mod error;
mod exclusion;
mod heap;
mod inheritance;
mod membership;
mod render;
mod snapshot;
mod space;
mod types;
mod value;
mod walker;

pub use analyzer::{Analysis, AnalysisStats, RelationAnalyzer};
pub use class::Class;
pub use config::AnalyzerConfig;
pub use container::{elements_of, flatten, is_container};
pub use error::{GraphError, Result};
pub use exclusion::exclude;
pub use heap::{Heap, ObjectId};
pub use inheritance::{build_inheritance, InheritanceDiscovery};
pub use membership::{belongs_to_target, Membership, NamespacePrefix};
pub use render::{ClassNode, RelationEdge, RelationGraph};
pub use snapshot::LoadedSnapshot;
pub use space::{Inspect, LiveObjects, Member, ObjectRef, ObjectSpace};
pub use types::{
    AggregationRelation, ClassRelationMap, InheritanceRelation, Multiplicity, Relation,
};
pub use value::Value;
pub use walker::{GraphWalker, MemberFilter, WalkOutcome, STRUCTURAL_MEMBERS};
