use crate::class::Class;
use crate::value::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A named outgoing reference of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member<H> {
    pub name: String,
    pub value: Value<H>,
}

impl<H> Member<H> {
    pub fn new(name: impl Into<String>, value: Value<H>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A population of objects the walker can inspect.
///
/// The handle is the object's identity: two handles are the same node iff
/// they compare equal, regardless of what the objects contain.
pub trait ObjectSpace {
    type Handle: Clone + Eq + Hash + fmt::Debug;

    /// Whether `object` was issued by this space. Other handles must not be
    /// passed to `class_of` or `members`.
    fn contains(&self, _object: &Self::Handle) -> bool {
        true
    }

    fn class_of(&self, object: &Self::Handle) -> Class;

    /// Every member the object exposes, structural ones included
    fn members(&self, object: &Self::Handle) -> Vec<Member<Self::Handle>>;
}

/// Inspectable fields of a live Rust value.
pub trait Inspect {
    fn class(&self) -> Class;

    fn members(&self) -> Vec<Member<ObjectRef>>;
}

/// Shared handle to a live object, compared by address.
#[derive(Clone)]
pub struct ObjectRef(Rc<dyn Inspect>);

impl ObjectRef {
    pub fn new<T: Inspect + 'static>(object: Rc<T>) -> Self {
        Self(object)
    }

    fn address(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl<T: Inspect + 'static> From<Rc<T>> for ObjectRef {
    fn from(object: Rc<T>) -> Self {
        Self::new(object)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:p}", self.0.class(), self.address())
    }
}

/// Object space over live [`Inspect`] values.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveObjects;

impl ObjectSpace for LiveObjects {
    type Handle = ObjectRef;

    fn class_of(&self, object: &ObjectRef) -> Class {
        object.0.class()
    }

    fn members(&self, object: &ObjectRef) -> Vec<Member<ObjectRef>> {
        object.0.members()
    }
}
