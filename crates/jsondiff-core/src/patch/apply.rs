//! Per-operation application against a mutable document.
//!
//! Every function either fully applies its operation or returns an error
//! with the document untouched.

use crate::{
    diff::{Path, PathSegment},
    Node, PatchError,
};

/// Reads an array index token: `0` or a decimal without leading zeros.
fn array_index(segment: &PathSegment, path: &Path) -> Result<usize, PatchError> {
    let invalid = || PatchError::InvalidArrayIndex { path: path.to_pointer(), token: segment.to_string() };
    match segment {
        PathSegment::Index(index) => Ok(*index),
        PathSegment::Key(token) => {
            let canonical = !token.is_empty()
                && token.bytes().all(|b| b.is_ascii_digit())
                && (token == "0" || !token.starts_with('0'));
            if !canonical {
                return Err(invalid());
            }
            token.parse().map_err(|_| invalid())
        }
    }
}

fn is_append_token(segment: &PathSegment) -> bool {
    matches!(segment, PathSegment::Key(token) if token == "-")
}

fn prefix_pointer(segments: &[PathSegment]) -> String {
    Path::from(segments.to_vec()).to_pointer()
}

fn not_a_container(segments: &[PathSegment], found: &Node) -> PatchError {
    PatchError::NotAContainer { path: prefix_pointer(segments), found: found.type_name() }
}

fn resolve_ref<'a>(doc: &'a Node, path: &Path) -> Result<&'a Node, PatchError> {
    let mut current = doc;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = match current {
            Node::Object(map) => map
                .get(segment.to_string().as_str())
                .ok_or_else(|| PatchError::PathNotFound { path: path.to_pointer() })?,
            Node::Array(items) => {
                let index = array_index(segment, path)?;
                items.get(index).ok_or(PatchError::IndexOutOfBounds {
                    path: path.to_pointer(),
                    index,
                    len: items.len(),
                })?
            }
            other => return Err(not_a_container(&path.segments()[..depth], other)),
        };
    }
    Ok(current)
}

fn resolve_mut<'a>(
    doc: &'a mut Node,
    segments: &[PathSegment],
    path: &Path,
) -> Result<&'a mut Node, PatchError> {
    let mut current = doc;
    for (depth, segment) in segments.iter().enumerate() {
        current = match current {
            Node::Object(map) => map
                .get_mut(segment.to_string().as_str())
                .ok_or_else(|| PatchError::PathNotFound { path: path.to_pointer() })?,
            Node::Array(items) => {
                let index = array_index(segment, path)?;
                let len = items.len();
                items.get_mut(index).ok_or(PatchError::IndexOutOfBounds {
                    path: path.to_pointer(),
                    index,
                    len,
                })?
            }
            other => return Err(not_a_container(&segments[..depth], other)),
        };
    }
    Ok(current)
}

/// The "add" operation inserts into an array (shifting later elements right,
/// `-` appends, the index may equal the length), sets an object member, or
/// replaces the whole document when `path` is the root.
///
/// The parent of the target location must exist.
pub(super) fn add(doc: &mut Node, path: &Path, value: Node) -> Result<(), PatchError> {
    let Some((parent, last)) = path.split_last() else {
        *doc = value;
        return Ok(());
    };
    match resolve_mut(doc, parent, path)? {
        Node::Object(map) => {
            map.insert(last.to_string(), value);
        }
        Node::Array(items) => {
            if is_append_token(last) {
                items.push(value);
                return Ok(());
            }
            let index = array_index(last, path)?;
            if index > items.len() {
                return Err(PatchError::IndexOutOfBounds { path: path.to_pointer(), index, len: items.len() });
            }
            items.insert(index, value);
        }
        other => return Err(not_a_container(parent, other)),
    }
    Ok(())
}

/// The "remove" operation deletes the value at the target location, which
/// must exist. Later array elements shift left. Returns the removed value.
pub(super) fn remove(doc: &mut Node, path: &Path) -> Result<Node, PatchError> {
    let Some((parent, last)) = path.split_last() else {
        return Err(PatchError::CannotRemoveRoot);
    };
    match resolve_mut(doc, parent, path)? {
        Node::Object(map) => map
            .shift_remove(last.to_string().as_str())
            .ok_or_else(|| PatchError::PathNotFound { path: path.to_pointer() }),
        Node::Array(items) => {
            let index = array_index(last, path)?;
            if index >= items.len() {
                return Err(PatchError::IndexOutOfBounds { path: path.to_pointer(), index, len: items.len() });
            }
            Ok(items.remove(index))
        }
        other => Err(not_a_container(parent, other)),
    }
}

/// The "replace" operation overwrites the value at the target location,
/// which must exist.
pub(super) fn replace(doc: &mut Node, path: &Path, value: Node) -> Result<(), PatchError> {
    let target = resolve_mut(doc, path.segments(), path)?;
    *target = value;
    Ok(())
}

/// The "move" operation removes the value at `from` and adds it at `path`.
///
/// `from` must exist and must not be a proper prefix of `path`: a location
/// cannot be moved into one of its own children.
pub(super) fn move_op(doc: &mut Node, from: &Path, path: &Path) -> Result<(), PatchError> {
    if from.is_proper_prefix_of(path) {
        return Err(PatchError::MoveIntoChild { from: from.to_pointer(), path: path.to_pointer() });
    }
    // Work on a copy so that a failing add does not lose the removed value.
    let mut staged = doc.clone();
    let value = remove(&mut staged, from)?;
    add(&mut staged, path, value)?;
    *doc = staged;
    Ok(())
}

/// The "copy" operation adds a deep copy of the value at `from` at `path`.
pub(super) fn copy(doc: &mut Node, from: &Path, path: &Path) -> Result<(), PatchError> {
    let value = resolve_ref(doc, from)?.clone();
    add(doc, path, value)
}

/// The "test" operation checks that the value at `path` is structurally
/// equal to `value`.
pub(super) fn test(doc: &Node, path: &Path, value: &Node) -> Result<(), PatchError> {
    let actual = resolve_ref(doc, path)?;
    if actual == value {
        Ok(())
    } else {
        Err(PatchError::TestFailed {
            path: path.to_pointer(),
            expected: value.to_json_string(),
            actual: actual.to_json_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(json: &str) -> Node {
        Node::from_json_str(json).unwrap()
    }

    fn ptr(pointer: &str) -> Path {
        Path::from_pointer(pointer).unwrap()
    }

    #[test]
    fn add_to_root_replaces_document() {
        let mut doc = node(r#"{"a":1}"#);
        add(&mut doc, &ptr(""), node("[1]")).unwrap();
        assert_eq!(doc, node("[1]"));
    }

    #[test]
    fn add_inserts_into_array_and_appends_with_dash() {
        let mut doc = node("[1,3]");
        add(&mut doc, &ptr("/1"), node("2")).unwrap();
        add(&mut doc, &ptr("/3"), node("4")).unwrap();
        add(&mut doc, &ptr("/-"), node("5")).unwrap();
        assert_eq!(doc, node("[1,2,3,4,5]"));
    }

    #[test]
    fn add_past_end_fails() {
        let mut doc = node("[1]");
        let err = add(&mut doc, &ptr("/2"), node("2")).unwrap_err();
        assert_eq!(err, PatchError::IndexOutOfBounds { path: "/2".to_string(), index: 2, len: 1 });
        assert_eq!(doc, node("[1]"));
    }

    #[test]
    fn add_overwrites_existing_member() {
        let mut doc = node(r#"{"a":1}"#);
        add(&mut doc, &ptr("/a"), node("2")).unwrap();
        assert_eq!(doc, node(r#"{"a":2}"#));
    }

    #[test]
    fn add_requires_existing_parent() {
        let mut doc = node(r#"{"q":{"bar":2}}"#);
        let err = add(&mut doc, &ptr("/a/b"), node("1")).unwrap_err();
        assert_eq!(err, PatchError::PathNotFound { path: "/a/b".to_string() });
    }

    #[test]
    fn add_below_scalar_fails() {
        let mut doc = node(r#"{"a":1}"#);
        let err = add(&mut doc, &ptr("/a/b"), node("1")).unwrap_err();
        assert_eq!(err, PatchError::NotAContainer { path: "/a".to_string(), found: "number" });
    }

    #[test]
    fn leading_zero_index_is_rejected() {
        let mut doc = node("[1,2]");
        let err = remove(&mut doc, &ptr("/01")).unwrap_err();
        assert_eq!(err, PatchError::InvalidArrayIndex { path: "/01".to_string(), token: "01".to_string() });
    }

    #[test]
    fn remove_shifts_elements_left() {
        let mut doc = node("[1,2,3]");
        assert_eq!(remove(&mut doc, &ptr("/0")).unwrap(), node("1"));
        assert_eq!(doc, node("[2,3]"));
    }

    #[test]
    fn remove_root_fails() {
        let mut doc = node("{}");
        assert_eq!(remove(&mut doc, &ptr("")).unwrap_err(), PatchError::CannotRemoveRoot);
    }

    #[test]
    fn remove_missing_member_fails() {
        let mut doc = node(r#"{"a":1}"#);
        assert_eq!(
            remove(&mut doc, &ptr("/b")).unwrap_err(),
            PatchError::PathNotFound { path: "/b".to_string() }
        );
    }

    #[test]
    fn replace_requires_existing_target() {
        let mut doc = node(r#"{"a":1}"#);
        replace(&mut doc, &ptr("/a"), node("[]")).unwrap();
        assert_eq!(doc, node(r#"{"a":[]}"#));
        assert!(replace(&mut doc, &ptr("/b"), node("1")).is_err());
    }

    #[test]
    fn move_relocates_value() {
        let mut doc = node(r#"{"a":{"b":1},"c":[]}"#);
        move_op(&mut doc, &ptr("/a/b"), &ptr("/c/0")).unwrap();
        assert_eq!(doc, node(r#"{"a":{},"c":[1]}"#));
    }

    #[test]
    fn move_into_own_child_fails() {
        let mut doc = node(r#"{"a":{"b":1}}"#);
        let err = move_op(&mut doc, &ptr("/a"), &ptr("/a/b/c")).unwrap_err();
        assert!(matches!(err, PatchError::MoveIntoChild { .. }));
    }

    #[test]
    fn failed_move_leaves_document_untouched() {
        let mut doc = node(r#"{"a":1}"#);
        assert!(move_op(&mut doc, &ptr("/a"), &ptr("/x/y")).is_err());
        assert_eq!(doc, node(r#"{"a":1}"#));
    }

    #[test]
    fn copy_duplicates_value() {
        let mut doc = node(r#"["AAA"]"#);
        copy(&mut doc, &ptr("/0"), &ptr("/1")).unwrap();
        assert_eq!(doc, node(r#"["AAA","AAA"]"#));
    }

    #[test]
    fn test_compares_structurally() {
        let doc = node(r#"{"a":{"x":1,"y":[true]}}"#);
        test(&doc, &ptr("/a"), &node(r#"{"y":[true],"x":1}"#)).unwrap();
        let err = test(&doc, &ptr("/a/x"), &node("1.0")).unwrap_err();
        assert_eq!(
            err,
            PatchError::TestFailed { path: "/a/x".to_string(), expected: "1.0".to_string(), actual: "1".to_string() }
        );
    }
}
