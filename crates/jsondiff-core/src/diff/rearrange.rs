use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::trace;

use crate::node::Node;

/// Hashable view of a scalar member value.
///
/// Numbers are keyed by their decoded text, so `1` and `1.0` stay distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum ScalarKey {
    Null,
    Bool(bool),
    Number(String),
    String(String),
}

impl ScalarKey {
    fn of(node: &Node) -> Option<Self> {
        match node {
            Node::Null => Some(Self::Null),
            Node::Bool(v) => Some(Self::Bool(*v)),
            Node::Number(n) => Some(Self::Number(n.to_string())),
            Node::String(s) => Some(Self::String(s.clone())),
            Node::Array(_) | Node::Object(_) => None,
        }
    }
}

/// Reorders `new` so that elements sharing a unique key with `original`
/// appear in `original`'s order, followed by the unmatched elements.
///
/// Returns `new` unchanged when `original` is not an array of objects, when
/// no member of the first original element is a unique scalar across all of
/// `original`, or when `new` cannot be indexed by that member.
pub(crate) fn rearrange(original: &[Node], new: &[Node]) -> Vec<Node> {
    let Some(Node::Object(first)) = original.first() else {
        return new.to_vec();
    };
    if original.iter().any(|item| !item.is_object()) {
        trace!("rearrange skipped: original holds non-object elements");
        return new.to_vec();
    }

    let Some((key, original_order)) = first
        .iter()
        .filter(|(_, value)| !value.is_container())
        .find_map(|(key, _)| unique_index(original, key).map(|order| (key.as_str(), order)))
    else {
        trace!("rearrange skipped: no unique scalar member");
        return new.to_vec();
    };

    let mut by_key: IndexMap<ScalarKey, &Node> = IndexMap::with_capacity(new.len());
    for item in new {
        let Some(value) = member_key(item, key) else {
            trace!(key, "rearrange skipped: new element cannot be keyed");
            return new.to_vec();
        };
        if by_key.insert(value, item).is_some() {
            trace!(key, "rearrange skipped: duplicate key in new");
            return new.to_vec();
        }
    }

    trace!(key, "rearranging array by unique member");
    let mut out = Vec::with_capacity(new.len());
    for value in &original_order {
        if let Some(item) = by_key.shift_remove(value) {
            out.push(item.clone());
        }
    }
    out.extend(by_key.into_values().cloned());
    out
}

fn member_key(item: &Node, key: &str) -> Option<ScalarKey> {
    match item {
        Node::Object(map) => map.get(key).and_then(ScalarKey::of),
        _ => None,
    }
}

/// Collects `key` across `items` in order, or `None` if it is missing,
/// non-scalar or repeated anywhere.
fn unique_index(items: &[Node], key: &str) -> Option<Vec<ScalarKey>> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut order = Vec::with_capacity(items.len());
    for item in items {
        let value = member_key(item, key)?;
        if !seen.insert(value.clone()) {
            return None;
        }
        order.push(value);
    }
    Some(order)
}
