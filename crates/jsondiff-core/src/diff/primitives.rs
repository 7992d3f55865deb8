use super::{Aborted, Collector, Path};
use crate::Node;

/// Compares two positions that cannot be walked together: scalars, or
/// containers of different kinds. A difference replaces the whole value.
///
/// An array meeting an object is not walked member by member: it is one
/// modification, so the merge patch writes the new container whole.
pub(super) fn diff_leaf(
    original: &Node,
    new: &Node,
    path: &Path,
    merge: bool,
    acc: &mut Collector<'_>,
) -> Result<Node, Aborted> {
    if original != new {
        acc.record_modified(path, original, new, merge)?;
    }
    Ok(new.clone())
}
