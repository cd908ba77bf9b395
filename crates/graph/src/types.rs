use crate::class::Class;
use relmap_protocol::{AggregationEntry, ClassEntry, MultiplicityKind, RelationReport};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How a reference was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Multiplicity {
    /// Held directly by an attribute
    Single,

    /// Held through a container
    Multiple,
}

/// An instance of `source` references an instance of `target` through `attribute`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AggregationRelation {
    pub source: Class,
    pub target: Class,
    pub attribute: String,
    pub multiplicity: Multiplicity,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InheritanceRelation {
    pub subclass: Class,
    pub superclass: Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    Aggregation(AggregationRelation),
    Inheritance(InheritanceRelation),
}

impl Relation {
    pub fn source(&self) -> &Class {
        match self {
            Relation::Aggregation(rel) => &rel.source,
            Relation::Inheritance(rel) => &rel.subclass,
        }
    }

    pub fn target(&self) -> &Class {
        match self {
            Relation::Aggregation(rel) => &rel.target,
            Relation::Inheritance(rel) => &rel.superclass,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Aggregation(rel) => {
                let marker = match rel.multiplicity {
                    Multiplicity::Single => "",
                    Multiplicity::Multiple => "[*]",
                };
                write!(
                    f,
                    "{} --{}{}--> {}",
                    rel.source, rel.attribute, marker, rel.target
                )
            }
            Relation::Inheritance(rel) => write!(f, "{} --|> {}", rel.subclass, rel.superclass),
        }
    }
}

impl From<AggregationRelation> for Relation {
    fn from(rel: AggregationRelation) -> Self {
        Relation::Aggregation(rel)
    }
}

impl From<InheritanceRelation> for Relation {
    fn from(rel: InheritanceRelation) -> Self {
        Relation::Inheritance(rel)
    }
}

/// Relations keyed by their source class (the subclass, for inheritance).
///
/// Ordered so iteration and serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRelationMap {
    relations: BTreeMap<Class, BTreeSet<Relation>>,
}

impl ClassRelationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `class` a key even if it never becomes a source
    pub fn seed(&mut self, class: &Class) {
        self.relations.entry(class.clone()).or_default();
    }

    /// Record an aggregation, one per (source, target, attribute).
    ///
    /// Seeing the same triple both directly and through a container keeps
    /// the `Multiple` record.
    pub fn insert_aggregation(&mut self, relation: AggregationRelation) -> bool {
        let set = self.relations.entry(relation.source.clone()).or_default();

        let flipped = AggregationRelation {
            multiplicity: match relation.multiplicity {
                Multiplicity::Single => Multiplicity::Multiple,
                Multiplicity::Multiple => Multiplicity::Single,
            },
            ..relation.clone()
        };
        let flipped = Relation::Aggregation(flipped);
        if set.contains(&flipped) {
            if relation.multiplicity == Multiplicity::Single {
                return false;
            }
            set.remove(&flipped);
        }
        set.insert(Relation::Aggregation(relation))
    }

    pub fn insert_inheritance(&mut self, relation: InheritanceRelation) -> bool {
        self.relations
            .entry(relation.subclass.clone())
            .or_default()
            .insert(Relation::Inheritance(relation))
    }

    pub fn insert(&mut self, relation: Relation) -> bool {
        match relation {
            Relation::Aggregation(rel) => self.insert_aggregation(rel),
            Relation::Inheritance(rel) => self.insert_inheritance(rel),
        }
    }

    pub fn get(&self, class: &Class) -> Option<&BTreeSet<Relation>> {
        self.relations.get(class)
    }

    pub fn contains_class(&self, class: &Class) -> bool {
        self.relations.contains_key(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.relations.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Class, &BTreeSet<Relation>)> {
        self.relations.iter()
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values().flatten()
    }

    pub fn aggregations_of<'a>(
        &'a self,
        class: &Class,
    ) -> impl Iterator<Item = &'a AggregationRelation> + 'a {
        self.relations.get(class).into_iter().flatten().filter_map(|rel| match rel {
            Relation::Aggregation(agg) => Some(agg),
            Relation::Inheritance(_) => None,
        })
    }

    pub fn inheritance_of<'a>(
        &'a self,
        class: &Class,
    ) -> impl Iterator<Item = &'a InheritanceRelation> + 'a {
        self.relations.get(class).into_iter().flatten().filter_map(|rel| match rel {
            Relation::Inheritance(inh) => Some(inh),
            Relation::Aggregation(_) => None,
        })
    }

    /// Classes that are aggregation targets, in or out of the key set
    pub fn aggregation_targets(&self) -> BTreeSet<Class> {
        self.relations()
            .filter_map(|rel| match rel {
                Relation::Aggregation(agg) => Some(agg.target.clone()),
                Relation::Inheritance(_) => None,
            })
            .collect()
    }

    /// Every class appearing as a key or as a relation target
    pub fn all_classes(&self) -> BTreeSet<Class> {
        let mut classes: BTreeSet<Class> = self.relations.keys().cloned().collect();
        classes.extend(self.relations().map(|rel| rel.target().clone()));
        classes
    }

    pub fn class_count(&self) -> usize {
        self.relations.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn remove_class(&mut self, class: &Class) -> Option<BTreeSet<Relation>> {
        self.relations.remove(class)
    }

    /// Keep only the relations for which `keep` returns true; keys stay
    pub fn retain_relations(&mut self, mut keep: impl FnMut(&Relation) -> bool) {
        for set in self.relations.values_mut() {
            set.retain(|rel| keep(rel));
        }
    }

    pub fn to_report(&self) -> RelationReport {
        let classes = self
            .relations
            .iter()
            .map(|(class, set)| ClassEntry {
                class: class.qualified_name().to_string(),
                aggregations: set
                    .iter()
                    .filter_map(|rel| match rel {
                        Relation::Aggregation(agg) => Some(AggregationEntry {
                            target: agg.target.qualified_name().to_string(),
                            attribute: agg.attribute.clone(),
                            multiplicity: match agg.multiplicity {
                                Multiplicity::Single => MultiplicityKind::Single,
                                Multiplicity::Multiple => MultiplicityKind::Multiple,
                            },
                        }),
                        Relation::Inheritance(_) => None,
                    })
                    .collect(),
                inherits: set
                    .iter()
                    .filter_map(|rel| match rel {
                        Relation::Inheritance(inh) => {
                            Some(inh.superclass.qualified_name().to_string())
                        }
                        Relation::Aggregation(_) => None,
                    })
                    .collect(),
            })
            .collect();
        RelationReport { classes }
    }
}

impl FromIterator<Relation> for ClassRelationMap {
    fn from_iter<I: IntoIterator<Item = Relation>>(iter: I) -> Self {
        let mut map = ClassRelationMap::new();
        for relation in iter {
            map.insert(relation);
        }
        map
    }
}
