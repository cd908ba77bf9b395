use crate::container::{flatten, is_container};
use crate::error::{GraphError, Result};
use crate::membership::Membership;
use crate::space::ObjectSpace;
use crate::types::{AggregationRelation, ClassRelationMap, Multiplicity};
use crate::value::Value;
use std::collections::{BTreeSet, HashSet};

/// Members that describe an object's machinery rather than what it references
pub const STRUCTURAL_MEMBERS: &[&str] = &[
    "__setattr__",
    "__reduce_ex__",
    "__new__",
    "__reduce__",
    "__str__",
    "__getattribute__",
    "__class__",
    "__delattr__",
    "__repr__",
    "__hash__",
    "__doc__",
    "__init__",
    "__dict__",
    "__module__",
    "__weakref__",
];

/// Which member names the walker follows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFilter {
    ignored: BTreeSet<String>,
}

impl MemberFilter {
    pub fn new<I, S>(ignored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored: ignored.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_interesting(&self, name: &str) -> bool {
        !self.ignored.contains(name)
    }
}

impl Default for MemberFilter {
    fn default() -> Self {
        Self::new(STRUCTURAL_MEMBERS.iter().copied())
    }
}

/// Result of one walk
#[derive(Debug, Clone)]
pub struct WalkOutcome<H> {
    /// Every in-target object reached, in discovery order
    pub visited: Vec<H>,

    /// Aggregation relations by source class; every visited class is a key
    pub relations: ClassRelationMap,
}

/// Discovers in-target objects reachable from a set of roots.
pub struct GraphWalker<'a, S: ObjectSpace + ?Sized, M: Membership + ?Sized> {
    space: &'a S,
    membership: &'a M,
    filter: MemberFilter,
    max_objects: Option<usize>,
}

struct WalkState<H> {
    visited: HashSet<H>,
    order: Vec<H>,
    pending: Vec<H>,
    relations: ClassRelationMap,
}

impl<'a, S, M> GraphWalker<'a, S, M>
where
    S: ObjectSpace + ?Sized,
    M: Membership + ?Sized,
{
    pub fn new(space: &'a S, membership: &'a M) -> Self {
        Self {
            space,
            membership,
            filter: MemberFilter::default(),
            max_objects: None,
        }
    }

    pub fn with_filter(mut self, filter: MemberFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Fail with [`GraphError::TraversalLimit`] once more than `limit` objects are reached
    pub fn with_max_objects(mut self, limit: Option<usize>) -> Self {
        self.max_objects = limit;
        self
    }

    pub fn walk(&self, roots: &[Value<S::Handle>]) -> Result<WalkOutcome<S::Handle>> {
        let mut state = WalkState {
            visited: HashSet::new(),
            order: Vec::new(),
            pending: Vec::new(),
            relations: ClassRelationMap::new(),
        };

        for root in roots {
            match root {
                Value::Object(handle) => {
                    self.check_known(handle)?;
                    if self.belongs(handle) {
                        self.discover(handle, &mut state)?;
                    } else {
                        log::warn!("Ignoring root {:?} outside the target", handle);
                    }
                }
                container if is_container(container) => {
                    for leaf in flatten(container)? {
                        self.check_known(leaf)?;
                        if self.belongs(leaf) {
                            self.discover(leaf, &mut state)?;
                        }
                    }
                }
                other => log::warn!("Ignoring {} root", other.kind()),
            }
        }

        // Explicit stack instead of recursion: depth is bounded by the heap, not the call stack.
        while let Some(object) = state.pending.pop() {
            let source = self.space.class_of(&object);
            log::trace!("Inspecting {:?} ({})", object, source);

            for member in self.space.members(&object) {
                if !self.filter.is_interesting(&member.name) {
                    continue;
                }

                match &member.value {
                    Value::Object(handle) if self.belongs(handle) => {
                        self.discover(handle, &mut state)?;
                        state.relations.insert_aggregation(AggregationRelation {
                            source: source.clone(),
                            target: self.space.class_of(handle),
                            attribute: member.name.clone(),
                            multiplicity: Multiplicity::Single,
                        });
                    }
                    value if is_container(value) => {
                        for leaf in flatten(value)? {
                            if !self.belongs(leaf) {
                                continue;
                            }
                            // Seen leaves still get their edge; only the descent is skipped.
                            self.discover(leaf, &mut state)?;
                            state.relations.insert_aggregation(AggregationRelation {
                                source: source.clone(),
                                target: self.space.class_of(leaf),
                                attribute: member.name.clone(),
                                multiplicity: Multiplicity::Multiple,
                            });
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(WalkOutcome {
            visited: state.order,
            relations: state.relations,
        })
    }

    fn check_known(&self, handle: &S::Handle) -> Result<()> {
        if self.space.contains(handle) {
            Ok(())
        } else {
            Err(GraphError::UnknownObject(format!("{handle:?}")))
        }
    }

    fn belongs(&self, handle: &S::Handle) -> bool {
        self.membership.belongs(&self.space.class_of(handle))
    }

    /// Mark `handle` visited and queue it, unless it already was
    fn discover(&self, handle: &S::Handle, state: &mut WalkState<S::Handle>) -> Result<()> {
        if !state.visited.insert(handle.clone()) {
            return Ok(());
        }
        if let Some(limit) = self.max_objects {
            if state.visited.len() > limit {
                return Err(GraphError::TraversalLimit { limit });
            }
        }
        state.relations.seed(&self.space.class_of(handle));
        state.order.push(handle.clone());
        state.pending.push(handle.clone());
        Ok(())
    }
}
