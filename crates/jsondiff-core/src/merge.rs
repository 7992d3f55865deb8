//! JSON Merge Patch (RFC 7386) application.

use crate::node::{Node, Object};

/// Applies `patch` to `target` in place.
///
/// An object patch is merged member by member: `null` deletes a member and
/// any other value is merged recursively. A non-object patch replaces the
/// target. A non-object target is replaced by an empty object before an
/// object patch is merged into it.
///
/// ```
/// # use jsondiff_core::{merge::apply_merge_patch, Node};
/// let mut doc = Node::from_json_str(r#"{"a":"b","c":{"d":"e","f":"g"}}"#)?;
/// let patch = Node::from_json_str(r#"{"a":"z","c":{"f":null}}"#)?;
/// apply_merge_patch(&mut doc, &patch);
/// assert_eq!(doc.to_json_string(), r#"{"a":"z","c":{"d":"e"}}"#);
/// # Ok::<(), jsondiff_core::CanonicalizeError>(())
/// ```
pub fn apply_merge_patch(target: &mut Node, patch: &Node) {
    let Node::Object(members) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Node::Object(Object::new());
    }
    let Node::Object(map) = target else {
        return;
    };
    for (key, value) in members {
        if value.is_null() {
            map.shift_remove(key);
            continue;
        }
        let slot = map.entry(key.clone()).or_insert(Node::Null);
        apply_merge_patch(slot, value);
    }
}
