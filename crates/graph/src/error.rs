use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    /// The flattener was handed a value that is not a sequence, mapping or set
    #[error("Not a container: {0}")]
    NotAContainer(&'static str),

    #[error("Inconsistent class hierarchy for {class}: no linearization of its bases exists")]
    InconsistentHierarchy { class: String },

    #[error("Traversal limit reached: more than {limit} objects reachable")]
    TraversalLimit { limit: usize },

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Unknown object: {0}")]
    UnknownObject(String),

    #[error("Duplicate definition: {0}")]
    Duplicate(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
