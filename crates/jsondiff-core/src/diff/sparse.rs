//! Growing sparse trees that only hold the ancestors of recorded values.

use tracing::warn;

use super::PathSegment;
use crate::node::{Node, Object};

/// Places `value` at `path` below `root`, creating missing containers.
///
/// A missing container becomes an array when the segment addressing into it
/// is an index and an object otherwise. With `create_intermediate` disabled,
/// meeting a `null` before the last segment makes the call a no-op: the
/// branch was already recorded as deleted.
pub(crate) fn place(
    root: &mut Option<Node>,
    path: &[PathSegment],
    value: Node,
    create_intermediate: bool,
) {
    let Some((first, _)) = path.split_first() else {
        *root = Some(value);
        return;
    };
    let slot = root.get_or_insert_with(|| empty_container_for(first));
    place_in(slot, path, value, create_intermediate);
}

fn empty_container_for(segment: &PathSegment) -> Node {
    match segment {
        PathSegment::Index(_) => Node::Array(Vec::new()),
        PathSegment::Key(_) => Node::Object(Object::new()),
    }
}

fn place_in(node: &mut Node, path: &[PathSegment], value: Node, create_intermediate: bool) {
    let Some((segment, rest)) = path.split_first() else {
        *node = value;
        return;
    };

    if !node.is_container() {
        if node.is_null() && !create_intermediate {
            return;
        }
        *node = empty_container_for(segment);
    }

    let Some(child) = child_slot(node, segment, rest.first()) else {
        warn!(%segment, "cannot address array with a non-numeric key; value dropped");
        return;
    };
    place_in(child, rest, value, create_intermediate);
}

/// Returns the slot for `segment`, creating it when absent. A freshly created
/// slot is seeded with the container type the following segment needs.
fn child_slot<'a>(
    node: &'a mut Node,
    segment: &PathSegment,
    next: Option<&PathSegment>,
) -> Option<&'a mut Node> {
    let seed = || next.map_or(Node::Null, empty_container_for);
    match node {
        Node::Object(map) => {
            let key = segment.to_string();
            Some(map.entry(key).or_insert_with(seed))
        }
        Node::Array(items) => {
            let index = match segment {
                PathSegment::Index(index) => *index,
                PathSegment::Key(key) => key.parse::<usize>().ok()?,
            };
            if index >= items.len() {
                items.resize(index, Node::Null);
                items.push(seed());
            }
            items.get_mut(index)
        }
        _ => None,
    }
}
