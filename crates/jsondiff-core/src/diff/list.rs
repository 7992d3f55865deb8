use std::borrow::Cow;

use super::{diff_impl, rearrange::rearrange, Aborted, Collector, Path, PathSegment};
use crate::Node;

/// Compares arrays position by position.
///
/// Removal addresses are shifted left by the number of removals already
/// recorded in this array, so applying the emitted `remove` operations in
/// order reproduces the new array. The removed tree keeps original indices.
///
/// Merge patches cannot address array elements: when anything below this
/// array differs, the whole reconciled array is written at `path`.
pub(super) fn diff_lists(
    lhs: &[Node],
    rhs: &[Node],
    path: &Path,
    merge: bool,
    acc: &mut Collector<'_>,
) -> Result<Vec<Node>, Aborted> {
    let rhs: Cow<'_, [Node]> = if acc.options().rearrange_arrays() {
        Cow::Owned(rearrange(lhs, rhs))
    } else {
        Cow::Borrowed(rhs)
    };

    let before = acc.diff_count();
    let mut out = Vec::with_capacity(rhs.len());
    let mut removed_offset = 0;

    for (index, value) in lhs.iter().enumerate() {
        acc.check_stop()?;
        let sub_path = path.with_segment(PathSegment::index(index - removed_offset));
        if let Some(other) = rhs.get(index) {
            out.push(diff_impl(value, other, &sub_path, false, acc)?);
        } else {
            let tree_path = path.with_segment(PathSegment::index(index));
            acc.record_removed(&sub_path, &tree_path, value, false)?;
            removed_offset += 1;
        }
    }

    for (index, value) in rhs.iter().enumerate().skip(lhs.len()) {
        let sub_path = path.with_segment(PathSegment::index(index));
        acc.record_added(&sub_path, value, false)?;
        out.push(value.clone());
    }

    if merge && acc.diff_count() > before {
        acc.record_merge(path, Node::Array(out.clone()));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::{DiffOptions, Node};

    fn node(json: &str) -> Node {
        Node::from_json_str(json).unwrap()
    }

    #[test]
    fn appended_elements_use_new_indices() {
        let diff = node("[1]").diff(&node("[1,2,3]"), &DiffOptions::default());
        assert_eq!(diff.added_paths(), ["/1", "/2"]);
        assert_eq!(diff.added().map(Node::to_json_string).as_deref(), Some("[null,2,3]"));
    }

    #[test]
    fn unchanged_array_leaves_merge_patch_empty() {
        let diff = node(r#"{"a":[1,2]}"#).diff(&node(r#"{"a":[1,2],"b":1}"#), &DiffOptions::default());
        assert_eq!(diff.merge_patch().map(Node::to_json_string).as_deref(), Some(r#"{"b":1}"#));
    }

    #[test]
    fn nested_array_change_writes_whole_array_to_merge_patch() {
        let original = node(r#"{"a":[{"x":1},{"x":2}]}"#);
        let new = node(r#"{"a":[{"x":1},{"x":3},{"x":4}]}"#);
        let diff = original.diff(&new, &DiffOptions::default());
        assert_eq!(diff.modified_paths(), ["/a/1/x"]);
        assert_eq!(diff.added_paths(), ["/a/2"]);
        assert_eq!(
            diff.merge_patch().map(Node::to_json_string).as_deref(),
            Some(r#"{"a":[{"x":1},{"x":3},{"x":4}]}"#)
        );
    }

    #[test]
    fn empty_arrays_compare_equal() {
        let diff = node("[]").diff(&node("[]"), &DiffOptions::default());
        assert!(diff.is_empty());
    }
}
