//! Loading a [`HeapSnapshot`] into a [`Heap`].

use crate::class::Class;
use crate::error::{GraphError, Result};
use crate::heap::{Heap, ObjectId};
use crate::value::Value;
use relmap_protocol::{ClassDecl, HeapSnapshot, SnapshotValue};
use std::collections::HashMap;

/// A resolved snapshot: the heap plus the roots to start the analysis from
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub heap: Heap,
    pub roots: Vec<Value<ObjectId>>,
}

impl Heap {
    pub fn from_snapshot(snapshot: &HeapSnapshot) -> Result<LoadedSnapshot> {
        let classes = resolve_classes(&snapshot.classes)?;

        let mut heap = Heap::new();
        for class in classes.values() {
            heap.register_class(class);
        }

        for decl in &snapshot.objects {
            let class = classes
                .get(decl.class.as_str())
                .ok_or_else(|| GraphError::UnknownClass(decl.class.clone()))?;
            heap.add_labeled_object(&decl.id, class)?;
        }

        for decl in &snapshot.objects {
            let Some(id) = heap.find_by_label(&decl.id) else {
                return Err(GraphError::UnknownObject(decl.id.clone()));
            };
            for (name, raw) in &decl.attributes {
                let value = convert_value(&heap, raw)?;
                heap.set_attr(id, name.clone(), value)?;
            }
        }

        let roots = snapshot
            .roots
            .iter()
            .map(|raw| convert_value(&heap, raw))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Loaded snapshot: {} classes, {} objects, {} roots",
            classes.len(),
            heap.len(),
            roots.len()
        );

        Ok(LoadedSnapshot { heap, roots })
    }
}

fn convert_value(heap: &Heap, raw: &SnapshotValue) -> Result<Value<ObjectId>> {
    Ok(match raw {
        SnapshotValue::Ref(id) => Value::Object(
            heap.find_by_label(id)
                .ok_or_else(|| GraphError::UnknownObject(id.clone()))?,
        ),
        SnapshotValue::List(items) => Value::Sequence(convert_all(heap, items)?),
        SnapshotValue::Set(items) => Value::Set(convert_all(heap, items)?),
        SnapshotValue::Map(entries) => Value::Mapping(
            entries
                .iter()
                .map(|(k, v)| Ok((convert_value(heap, k)?, convert_value(heap, v)?)))
                .collect::<Result<Vec<_>>>()?,
        ),
        SnapshotValue::Scalar(_) => Value::Scalar,
    })
}

fn convert_all(heap: &Heap, items: &[SnapshotValue]) -> Result<Vec<Value<ObjectId>>> {
    items.iter().map(|item| convert_value(heap, item)).collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Build every declared class, bases first, regardless of declaration order
fn resolve_classes(decls: &[ClassDecl]) -> Result<HashMap<String, Class>> {
    let mut by_name: HashMap<String, &ClassDecl> = HashMap::with_capacity(decls.len());
    for decl in decls {
        let qualified = decl.qualified_name();
        if by_name.insert(qualified.clone(), decl).is_some() {
            return Err(GraphError::Duplicate(format!("class {qualified}")));
        }
    }

    let mut built: HashMap<String, Class> = HashMap::with_capacity(decls.len());
    let mut marks: HashMap<String, Mark> = HashMap::new();

    for decl in decls {
        let mut stack = vec![decl.qualified_name()];
        while let Some(current) = stack.last().cloned() {
            if marks.get(&current) == Some(&Mark::Done) {
                stack.pop();
                continue;
            }

            let decl = by_name
                .get(&current)
                .ok_or_else(|| GraphError::UnknownClass(current.clone()))?;

            let pending: Vec<&String> = decl
                .bases
                .iter()
                .filter(|base| marks.get(*base) != Some(&Mark::Done))
                .collect();

            if pending.is_empty() {
                let bases = decl
                    .bases
                    .iter()
                    .map(|base| built[base].clone())
                    .collect();
                let class = Class::new(decl.name.clone(), decl.namespace.as_deref(), bases)?;
                built.insert(current.clone(), class);
                marks.insert(current, Mark::Done);
                stack.pop();
                continue;
            }

            marks.insert(current.clone(), Mark::InProgress);
            for base in pending {
                if marks.get(base) == Some(&Mark::InProgress) {
                    return Err(GraphError::InvalidSnapshot(format!(
                        "inheritance cycle through {base}"
                    )));
                }
                if !by_name.contains_key(base) {
                    return Err(GraphError::UnknownClass(base.clone()));
                }
                stack.push(base.clone());
            }
        }
    }

    Ok(built)
}
