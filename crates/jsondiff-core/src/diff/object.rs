use super::{diff_impl, Aborted, Collector, Path, PathSegment};
use crate::node::Object;

/// Walks object members in the original's order, then the additions in the
/// new object's order. Returns the reconciled object in that order.
pub(super) fn diff_objects(
    lhs: &Object,
    rhs: &Object,
    path: &Path,
    merge: bool,
    acc: &mut Collector<'_>,
) -> Result<Object, Aborted> {
    let mut out = Object::with_capacity(rhs.len());

    for (key, value) in lhs {
        acc.check_stop()?;
        let sub_path = path.with_segment(PathSegment::key(key.as_str()));
        if let Some(other) = rhs.get(key) {
            let reconciled = diff_impl(value, other, &sub_path, merge, acc)?;
            out.insert(key.clone(), reconciled);
        } else {
            acc.record_removed(&sub_path, &sub_path, value, merge)?;
        }
    }

    for (key, value) in rhs {
        if lhs.contains_key(key) {
            continue;
        }
        let sub_path = path.with_segment(PathSegment::key(key.as_str()));
        acc.record_added(&sub_path, value, merge)?;
        out.insert(key.clone(), value.clone());
    }

    Ok(out)
}
