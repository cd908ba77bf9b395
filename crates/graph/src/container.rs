//! Recognition and flattening of the three container kinds.

use crate::error::{GraphError, Result};
use crate::value::Value;

pub fn is_container<H>(value: &Value<H>) -> bool {
    matches!(
        value,
        Value::Sequence(_) | Value::Mapping(_) | Value::Set(_)
    )
}

/// Direct elements of a container, paired with their mapping key when there is one.
///
/// Calling this on a non-container is a contract violation.
pub fn elements_of<H>(container: &Value<H>) -> Result<Vec<(Option<&Value<H>>, &Value<H>)>> {
    match container {
        Value::Sequence(items) | Value::Set(items) => {
            Ok(items.iter().map(|item| (None, item)).collect())
        }
        Value::Mapping(entries) => Ok(entries.iter().map(|(k, v)| (Some(k), v)).collect()),
        other => Err(GraphError::NotAContainer(other.kind())),
    }
}

/// Leaf objects of a container, nested containers expanded in place.
///
/// Only the value side of mapping entries is inspected. Scalars are dropped.
pub fn flatten<H>(container: &Value<H>) -> Result<Vec<&H>> {
    let mut leaves = Vec::new();
    collect_leaves(container, &mut leaves)?;
    Ok(leaves)
}

fn collect_leaves<'a, H>(container: &'a Value<H>, leaves: &mut Vec<&'a H>) -> Result<()> {
    for (_key, element) in elements_of(container)? {
        match element {
            Value::Object(handle) => leaves.push(handle),
            nested if is_container(nested) => collect_leaves(nested, leaves)?,
            _ => {}
        }
    }
    Ok(())
}
