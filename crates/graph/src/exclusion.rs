use crate::class::Class;
use crate::types::ClassRelationMap;
use std::collections::BTreeSet;

/// Drop `excluded` classes as keys and every relation pointing at them.
///
/// Classes that are not in the map are ignored.
pub fn exclude(mut relations: ClassRelationMap, excluded: &BTreeSet<Class>) -> ClassRelationMap {
    if excluded.is_empty() {
        return relations;
    }

    for class in excluded {
        if relations.remove_class(class).is_some() {
            log::debug!("Excluded {class}");
        }
    }
    relations.retain_relations(|relation| !excluded.contains(relation.target()));
    relations
}
