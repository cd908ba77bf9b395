use pretty_assertions::assert_eq;
use relmap_graph::{
    AggregationRelation, AnalyzerConfig, Class, ClassRelationMap, Heap, InheritanceDiscovery,
    InheritanceRelation, Multiplicity, NamespacePrefix, Relation, RelationAnalyzer, Value,
};
use std::collections::BTreeSet;

fn analyzer(namespace: &str) -> RelationAnalyzer<NamespacePrefix> {
    RelationAnalyzer::from_config(AnalyzerConfig::for_namespace(namespace)).expect("analyzer")
}

fn agg(source: &Class, target: &Class, attribute: &str, multiplicity: Multiplicity) -> Relation {
    Relation::Aggregation(AggregationRelation {
        source: source.clone(),
        target: target.clone(),
        attribute: attribute.to_string(),
        multiplicity,
    })
}

fn inh(subclass: &Class, superclass: &Class) -> Relation {
    Relation::Inheritance(InheritanceRelation {
        subclass: subclass.clone(),
        superclass: superclass.clone(),
    })
}

fn relations_of(map: &ClassRelationMap, class: &Class) -> BTreeSet<Relation> {
    map.get(class).cloned().unwrap_or_default()
}

#[test]
fn parent_child_scenario() {
    let parent = Class::root("Parent", Some("app"));
    let child = Class::new("Child", Some("app"), vec![parent.clone()]).unwrap();

    let mut heap = Heap::new();
    let p = heap.add_object(&parent);
    let c = heap.add_object(&child);
    heap.set_attr(p, "child", Value::Object(c)).unwrap();
    heap.set_attr(c, "items", Value::Sequence(vec![Value::Object(c), Value::Object(p)]))
        .unwrap();

    let analysis = analyzer("app")
        .analyze(&heap, &[Value::Object(p), Value::Object(c)], &BTreeSet::new())
        .unwrap();
    let map = &analysis.relations;

    assert_eq!(map.classes().cloned().collect::<Vec<_>>(), vec![child.clone(), parent.clone()]);
    assert_eq!(
        relations_of(map, &parent),
        BTreeSet::from([agg(&parent, &child, "child", Multiplicity::Single)])
    );
    assert_eq!(
        relations_of(map, &child),
        BTreeSet::from([
            agg(&child, &child, "items", Multiplicity::Multiple),
            agg(&child, &parent, "items", Multiplicity::Multiple),
            inh(&child, &parent),
        ])
    );
    assert_eq!(analysis.stats.objects_visited, 2);
    assert_eq!(analysis.stats.aggregation_relations, 3);
    assert_eq!(analysis.stats.inheritance_relations, 1);
}

#[test]
fn three_level_hierarchy_has_no_shortcut_edge() {
    let a = Class::root("A", Some("app"));
    let b = Class::new("B", Some("app"), vec![a.clone()]).unwrap();
    let c = Class::new("C", Some("app"), vec![b.clone()]).unwrap();

    let mut heap = Heap::new();
    let obj = heap.add_object(&c);

    let analysis = analyzer("app")
        .analyze(&heap, &[Value::Object(obj)], &BTreeSet::new())
        .unwrap();
    let inheritance: Vec<_> = analysis
        .relations
        .relations()
        .filter(|rel| matches!(rel, Relation::Inheritance(_)))
        .cloned()
        .collect();

    assert_eq!(inheritance, vec![inh(&b, &a), inh(&c, &b)]);
    assert!(!analysis.relations.get(&c).unwrap().contains(&inh(&c, &a)));
}

#[test]
fn immediate_parent_mode_stops_after_one_level() {
    let a = Class::root("A", Some("app"));
    let b = Class::new("B", Some("app"), vec![a.clone()]).unwrap();
    let c = Class::new("C", Some("app"), vec![b.clone()]).unwrap();

    let mut heap = Heap::new();
    let obj = heap.add_object(&c);

    let config = AnalyzerConfig {
        inheritance: InheritanceDiscovery::ImmediateParents,
        ..AnalyzerConfig::for_namespace("app")
    };
    let analysis = RelationAnalyzer::from_config(config)
        .unwrap()
        .analyze(&heap, &[Value::Object(obj)], &BTreeSet::new())
        .unwrap();

    let edges: Vec<_> = analysis.relations.relations().cloned().collect();
    assert_eq!(edges, vec![inh(&c, &b)]);
}

#[test]
fn exclusion_strips_keys_and_targets() {
    let base = Class::root("Base", Some("app"));
    let cache = Class::new("Cache", Some("app"), vec![base.clone()]).unwrap();
    let service = Class::root("Service", Some("app"));
    let config = Class::root("Config", Some("app"));

    let mut heap = Heap::new();
    let s = heap.add_object(&service);
    let k = heap.add_object(&cache);
    let cfg = heap.add_object(&config);
    heap.set_attr(s, "cache", Value::Object(k)).unwrap();
    heap.set_attr(s, "config", Value::Object(cfg)).unwrap();
    heap.set_attr(k, "config", Value::Object(cfg)).unwrap();

    let analysis = analyzer("app")
        .analyze(&heap, &[Value::Object(s)], &BTreeSet::from([cache.clone()]))
        .unwrap();
    let map = &analysis.relations;

    assert!(!map.contains_class(&cache));
    assert!(map.relations().all(|rel| rel.target() != &cache));
    assert_eq!(
        relations_of(map, &service),
        BTreeSet::from([agg(&service, &config, "config", Multiplicity::Single)])
    );
    assert!(map.contains_class(&config));
    assert!(!map.contains_class(&base), "base only reachable through the excluded class");
}

#[test]
fn sibling_namespace_is_invisible() {
    let local = Class::root("Widget", Some("app.ui"));
    let sibling = Class::root("Widget", Some("app_extra.ui"));

    let mut heap = Heap::new();
    let w = heap.add_object(&local);
    let foreign = heap.add_object(&sibling);
    heap.set_attr(w, "twin", Value::Object(foreign)).unwrap();
    heap.set_attr(w, "twins", Value::Sequence(vec![Value::Object(foreign)])).unwrap();

    let analysis = analyzer("app")
        .analyze(&heap, &[Value::Object(w), Value::Object(foreign)], &BTreeSet::new())
        .unwrap();

    assert_eq!(analysis.stats.objects_visited, 1);
    assert!(!analysis.relations.all_classes().contains(&sibling));
}

#[test]
fn out_of_namespace_ancestor_is_a_target_not_a_key() {
    let model = Class::root("Model", Some("orm"));
    let user = Class::new("User", Some("app"), vec![model.clone()]).unwrap();

    let mut heap = Heap::new();
    let u = heap.add_object(&user);

    let analysis = analyzer("app")
        .analyze(&heap, &[Value::Object(u)], &BTreeSet::new())
        .unwrap();

    assert!(!analysis.relations.contains_class(&model));
    assert_eq!(relations_of(&analysis.relations, &user), BTreeSet::from([inh(&user, &model)]));
}

#[test]
fn class_without_relations_is_still_a_key() {
    let lonely = Class::root("Lonely", Some("app"));
    let mut heap = Heap::new();
    let l = heap.add_object(&lonely);
    heap.set_attr(l, "count", Value::Scalar).unwrap();

    let analysis = analyzer("app")
        .analyze(&heap, &[Value::Sequence(vec![Value::Object(l)]), Value::Scalar], &BTreeSet::new())
        .unwrap();

    assert!(analysis.relations.contains_class(&lonely));
    assert_eq!(analysis.relations.relation_count(), 0);
}
