/// A value held by an object attribute or supplied as an analysis root.
///
/// `H` is the object handle of the [`ObjectSpace`](crate::ObjectSpace) the value lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<H> {
    Object(H),
    Sequence(Vec<Value<H>>),
    /// Key/value entries in iteration order
    Mapping(Vec<(Value<H>, Value<H>)>),
    Set(Vec<Value<H>>),
    /// Anything that is neither an object nor a container
    Scalar,
}

impl<H> Value<H> {
    pub fn as_object(&self) -> Option<&H> {
        match self {
            Value::Object(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Object(_) => "object",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Set(_) => "set",
            Value::Scalar => "scalar",
        }
    }
}

impl<H> From<H> for Value<H> {
    fn from(handle: H) -> Self {
        Value::Object(handle)
    }
}
