use crate::class::Class;
use crate::error::{GraphError, Result};
use crate::space::{Member, ObjectSpace};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Arena index of an object in a [`Heap`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct HeapObject {
    class: Class,
    attributes: BTreeMap<String, Value<ObjectId>>,
}

/// Arena-backed object graph that can be built and mutated in place.
///
/// An [`ObjectId`] is only meaningful for the heap that issued it. Handles
/// stored through [`set_attr`](Self::set_attr) are checked; roots handed to
/// the analyzer are checked through [`ObjectSpace::contains`].
#[derive(Debug, Clone, Default)]
pub struct Heap {
    objects: Vec<HeapObject>,
    labels: HashMap<String, ObjectId>,
    classes: BTreeMap<String, Class>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a class resolvable by qualified name without instantiating it
    pub fn register_class(&mut self, class: &Class) {
        for declared in class.linearization() {
            self.classes
                .entry(declared.qualified_name().to_string())
                .or_insert_with(|| declared.clone());
        }
    }

    pub fn add_object(&mut self, class: &Class) -> ObjectId {
        self.register_class(class);
        let id = ObjectId(self.objects.len());
        self.objects.push(HeapObject {
            class: class.clone(),
            attributes: BTreeMap::new(),
        });
        id
    }

    pub fn add_labeled_object(&mut self, label: &str, class: &Class) -> Result<ObjectId> {
        if self.labels.contains_key(label) {
            return Err(GraphError::Duplicate(format!("object id {label}")));
        }
        let id = self.add_object(class);
        self.labels.insert(label.to_string(), id);
        Ok(id)
    }

    /// Set or replace an attribute; every object in `value` must belong to this heap
    pub fn set_attr(
        &mut self,
        object: ObjectId,
        name: impl Into<String>,
        value: Value<ObjectId>,
    ) -> Result<()> {
        self.check_handles(&value)?;
        let entry = self
            .objects
            .get_mut(object.0)
            .ok_or_else(|| GraphError::UnknownObject(format!("{object:?}")))?;
        entry.attributes.insert(name.into(), value);
        Ok(())
    }

    pub fn find_by_label(&self, label: &str) -> Option<ObjectId> {
        self.labels.get(label).copied()
    }

    pub fn class(&self, qualified_name: &str) -> Option<&Class> {
        self.classes.get(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn check_handles(&self, value: &Value<ObjectId>) -> Result<()> {
        match value {
            Value::Object(id) if id.0 >= self.objects.len() => {
                Err(GraphError::UnknownObject(format!("{id:?}")))
            }
            Value::Sequence(items) | Value::Set(items) => {
                items.iter().try_for_each(|item| self.check_handles(item))
            }
            Value::Mapping(entries) => entries.iter().try_for_each(|(k, v)| {
                self.check_handles(k)?;
                self.check_handles(v)
            }),
            _ => Ok(()),
        }
    }

    /// Callers check [`ObjectSpace::contains`] first for handles from outside.
    fn object(&self, id: ObjectId) -> &HeapObject {
        &self.objects[id.0]
    }
}

impl ObjectSpace for Heap {
    type Handle = ObjectId;

    fn contains(&self, object: &ObjectId) -> bool {
        object.0 < self.objects.len()
    }

    fn class_of(&self, object: &ObjectId) -> Class {
        self.object(*object).class.clone()
    }

    fn members(&self, object: &ObjectId) -> Vec<Member<ObjectId>> {
        self.object(*object)
            .attributes
            .iter()
            .map(|(name, value)| Member::new(name.clone(), value.clone()))
            .collect()
    }
}
