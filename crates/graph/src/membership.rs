use crate::class::Class;
use crate::space::ObjectSpace;
use crate::value::Value;

/// Decides whether a class belongs to the analysis target.
pub trait Membership {
    fn belongs(&self, class: &Class) -> bool;
}

impl<F> Membership for F
where
    F: Fn(&Class) -> bool,
{
    fn belongs(&self, class: &Class) -> bool {
        self(class)
    }
}

/// Member iff the class namespace is `target` or nested below it.
///
/// Matching is per dotted segment: `app.models` is under `app`, `apparel` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePrefix {
    target: String,
}

impl NamespacePrefix {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn matches(&self, namespace: &str) -> bool {
        match namespace.strip_prefix(self.target.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('.'),
            None => false,
        }
    }
}

impl Membership for NamespacePrefix {
    fn belongs(&self, class: &Class) -> bool {
        // Classes with an unresolvable namespace never belong.
        class.namespace().is_some_and(|ns| self.matches(ns))
    }
}

/// Whether `value` is an object whose class belongs to the target
pub fn belongs_to_target<S, M>(space: &S, membership: &M, value: &Value<S::Handle>) -> bool
where
    S: ObjectSpace + ?Sized,
    M: Membership + ?Sized,
{
    match value {
        Value::Object(handle) => membership.belongs(&space.class_of(handle)),
        _ => false,
    }
}
