use crate::error::{GraphError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A class in the analyzed type system.
///
/// Cheap to clone. Two handles are equal when their qualified names match,
/// so a class table must not declare the same qualified name twice.
#[derive(Clone)]
pub struct Class(Rc<ClassData>);

struct ClassData {
    name: String,
    namespace: Option<String>,
    qualified_name: String,
    bases: Vec<Class>,
    /// C3 linearization without `self`. The universal root type is implicit.
    ancestors: Vec<Class>,
}

impl Class {
    /// Declare a class with its direct bases in declaration order.
    ///
    /// Fails when the bases admit no C3 linearization.
    pub fn new(
        name: impl Into<String>,
        namespace: Option<&str>,
        bases: Vec<Class>,
    ) -> Result<Self> {
        let (name, namespace, qualified_name) = qualify(name.into(), namespace);
        let ancestors = linearize(&bases).ok_or_else(|| GraphError::InconsistentHierarchy {
            class: qualified_name.clone(),
        })?;

        Ok(Class(Rc::new(ClassData {
            name,
            namespace,
            qualified_name,
            bases,
            ancestors,
        })))
    }

    /// A class with no bases.
    pub fn root(name: impl Into<String>, namespace: Option<&str>) -> Self {
        let (name, namespace, qualified_name) = qualify(name.into(), namespace);
        Class(Rc::new(ClassData {
            name,
            namespace,
            qualified_name,
            bases: Vec::new(),
            ancestors: Vec::new(),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Declaring namespace; `None` when it could not be resolved
    pub fn namespace(&self) -> Option<&str> {
        self.0.namespace.as_deref()
    }

    pub fn qualified_name(&self) -> &str {
        &self.0.qualified_name
    }

    pub fn bases(&self) -> &[Class] {
        &self.0.bases
    }

    /// Linearized ancestor chain, nearest first, without `self`
    pub fn ancestors(&self) -> &[Class] {
        &self.0.ancestors
    }

    /// Full linearization, `self` first
    pub fn linearization(&self) -> impl Iterator<Item = &Class> {
        std::iter::once(self).chain(self.ancestors())
    }

    /// Reflexive: every class is a subclass of itself
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self == other || self.ancestors().iter().any(|ancestor| ancestor == other)
    }
}

/// Name, normalized namespace (empty means unresolved) and dotted qualified name
fn qualify(name: String, namespace: Option<&str>) -> (String, Option<String>, String) {
    let namespace = namespace.filter(|ns| !ns.is_empty()).map(str::to_string);
    let qualified_name = match &namespace {
        Some(ns) => format!("{}.{}", ns, name),
        None => name.clone(),
    };
    (name, namespace, qualified_name)
}

/// C3 merge over the linearizations of `bases` followed by `bases` itself.
fn linearize(bases: &[Class]) -> Option<Vec<Class>> {
    let mut sequences: Vec<Vec<Class>> = bases
        .iter()
        .map(|base| base.linearization().cloned().collect())
        .collect();
    sequences.push(bases.to_vec());

    let mut merged = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Some(merged);
        }

        let candidate = sequences.iter().find_map(|seq| {
            let head = &seq[0];
            let in_tail = sequences.iter().any(|other| other[1..].contains(head));
            (!in_tail).then(|| head.clone())
        })?;

        for seq in &mut sequences {
            if seq[0] == candidate {
                seq.remove(0);
            }
        }
        merged.push(candidate);
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.qualified_name == other.0.qualified_name
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.qualified_name.hash(state);
    }
}

impl PartialOrd for Class {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Class {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.qualified_name.cmp(&other.0.qualified_name)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.0.qualified_name)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.qualified_name)
    }
}
