//! Structural diff between two documents.
//!
//! A single traversal produces every artifact at once: sparse trees holding
//! the removed, added and modified values, rendered path lists, counts, the
//! rearranged new document, a JSON Patch and a JSON Merge Patch.

mod list;
mod object;
mod path;
mod primitives;
mod rearrange;
mod sparse;

pub use path::{escape_segment, Path, PathSegment};

use serde::Serialize;
use tracing::debug;

use crate::{DiffOptions, Node, Patch, PatchOperation, PathDialect};

/// Outcome of comparing an original document with a new one.
///
/// ```
/// # use jsondiff_core::{DiffOptions, Node};
/// let original = Node::from_json_str(r#"{"a":1,"b":[1,2]}"#)?;
/// let new = Node::from_json_str(r#"{"b":[1,3],"c":true}"#)?;
/// let diff = original.diff(&new, &DiffOptions::default());
/// assert_eq!(diff.removed_paths(), ["/a"]);
/// assert_eq!(diff.modified_paths(), ["/b/1"]);
/// assert_eq!(diff.added_paths(), ["/c"]);
/// assert_eq!(diff.diff_count(), 3);
/// assert_eq!(
///     diff.merge_patch().map(Node::to_json_string).as_deref(),
///     Some(r#"{"a":null,"b":[1,3],"c":true}"#),
/// );
/// # Ok::<(), jsondiff_core::CanonicalizeError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diff {
    removed: Option<Node>,
    added: Option<Node>,
    modified_original: Option<Node>,
    modified_new: Option<Node>,
    removed_paths: Vec<String>,
    added_paths: Vec<String>,
    modified_paths: Vec<String>,
    removed_count: usize,
    added_count: usize,
    modified_count: usize,
    rearranged: Node,
    #[serde(skip_serializing_if = "Option::is_none")]
    patch: Option<Patch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    merge_patch: Option<Node>,
    stopped_early: bool,
}

impl Diff {
    /// Sparse subset of the original holding the removed members.
    #[must_use]
    pub fn removed(&self) -> Option<&Node> {
        self.removed.as_ref()
    }

    /// Sparse subset of the new document holding the added members.
    #[must_use]
    pub fn added(&self) -> Option<&Node> {
        self.added.as_ref()
    }

    /// Original values of modified positions, arranged as a sparse tree.
    #[must_use]
    pub fn modified_original(&self) -> Option<&Node> {
        self.modified_original.as_ref()
    }

    /// New values of modified positions; same path set as [`Diff::modified_original`].
    #[must_use]
    pub fn modified_new(&self) -> Option<&Node> {
        self.modified_new.as_ref()
    }

    /// Rendered paths of removed members, in traversal order.
    #[must_use]
    pub fn removed_paths(&self) -> &[String] {
        &self.removed_paths
    }

    /// Rendered paths of added members, in traversal order.
    #[must_use]
    pub fn added_paths(&self) -> &[String] {
        &self.added_paths
    }

    /// Rendered paths of modified values, in traversal order.
    #[must_use]
    pub fn modified_paths(&self) -> &[String] {
        &self.modified_paths
    }

    /// Number of removed members.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed_count
    }

    /// Number of added members.
    #[must_use]
    pub fn added_count(&self) -> usize {
        self.added_count
    }

    /// Number of modified values.
    #[must_use]
    pub fn modified_count(&self) -> usize {
        self.modified_count
    }

    /// Total number of differences.
    #[must_use]
    pub fn diff_count(&self) -> usize {
        self.removed_count + self.added_count + self.modified_count
    }

    /// Indicates whether no difference was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diff_count() == 0
    }

    /// The new document with arrays reordered to resemble the original.
    ///
    /// Without array rearrangement this equals the new document. It is
    /// `null` when the traversal stopped early.
    #[must_use]
    pub fn rearranged(&self) -> &Node {
        &self.rearranged
    }

    /// JSON Patch turning the original into [`Diff::rearranged`], unless skipped.
    #[must_use]
    pub fn patch(&self) -> Option<&Patch> {
        self.patch.as_ref()
    }

    /// JSON Merge Patch turning the original into [`Diff::rearranged`], unless skipped.
    ///
    /// The root is an empty object when nothing differs and the new document
    /// is not `null`.
    #[must_use]
    pub fn merge_patch(&self) -> Option<&Node> {
        self.merge_patch.as_ref()
    }

    /// Indicates whether the traversal was cut short by the stop-on-diff option.
    ///
    /// The difference that triggers the stop is counted but not recorded.
    #[must_use]
    pub fn stopped_early(&self) -> bool {
        self.stopped_early
    }
}

/// Marker returned when the stop-on-diff option interrupts the traversal.
#[derive(Debug)]
pub(crate) struct Aborted;

/// Accumulates the artifacts of a single diff run.
pub(crate) struct Collector<'a> {
    options: &'a DiffOptions,
    dialect: PathDialect,
    removed: Option<Node>,
    added: Option<Node>,
    modified_original: Option<Node>,
    modified_new: Option<Node>,
    merge: Option<Node>,
    removed_paths: Vec<String>,
    added_paths: Vec<String>,
    modified_paths: Vec<String>,
    removed_count: usize,
    added_count: usize,
    modified_count: usize,
    patch: Option<Vec<PatchOperation>>,
}

impl<'a> Collector<'a> {
    fn new(options: &'a DiffOptions) -> Self {
        Self {
            options,
            dialect: options.path_dialect(),
            removed: None,
            added: None,
            modified_original: None,
            modified_new: None,
            merge: None,
            removed_paths: Vec::new(),
            added_paths: Vec::new(),
            modified_paths: Vec::new(),
            removed_count: 0,
            added_count: 0,
            modified_count: 0,
            patch: (!options.skip_json_patch()).then(Vec::new),
        }
    }

    pub(crate) fn options(&self) -> &DiffOptions {
        self.options
    }

    pub(crate) fn diff_count(&self) -> usize {
        self.removed_count + self.added_count + self.modified_count
    }

    fn stop_requested(&self) -> bool {
        self.options.stop_on_diff() && self.diff_count() > 0
    }

    /// Interrupts the traversal once any difference is known and stopping is enabled.
    pub(crate) fn check_stop(&self) -> Result<(), Aborted> {
        if self.stop_requested() {
            Err(Aborted)
        } else {
            Ok(())
        }
    }

    pub(crate) fn record_modified(
        &mut self,
        path: &Path,
        original: &Node,
        new: &Node,
        merge: bool,
    ) -> Result<(), Aborted> {
        self.modified_count += 1;
        self.check_stop()?;
        self.modified_paths.push(path.render(self.dialect));
        sparse::place(&mut self.modified_original, path.segments(), original.clone(), true);
        sparse::place(&mut self.modified_new, path.segments(), new.clone(), true);
        if let Some(ops) = self.patch.as_mut() {
            ops.push(PatchOperation::Test { path: path.clone(), value: original.clone() });
            ops.push(PatchOperation::Replace { path: path.clone(), value: new.clone() });
        }
        if merge {
            sparse::place(&mut self.merge, path.segments(), new.clone(), true);
        }
        Ok(())
    }

    /// Records a removed member. `tree_path` locates it in the removed tree,
    /// which mirrors the original; `path` is the renumbered address.
    pub(crate) fn record_removed(
        &mut self,
        path: &Path,
        tree_path: &Path,
        original: &Node,
        merge: bool,
    ) -> Result<(), Aborted> {
        self.removed_count += 1;
        self.check_stop()?;
        self.removed_paths.push(path.render(self.dialect));
        sparse::place(&mut self.removed, tree_path.segments(), original.clone(), true);
        if let Some(ops) = self.patch.as_mut() {
            ops.push(PatchOperation::Remove { path: path.clone() });
        }
        if merge {
            sparse::place(&mut self.merge, path.segments(), Node::Null, false);
        }
        Ok(())
    }

    pub(crate) fn record_added(&mut self, path: &Path, new: &Node, merge: bool) -> Result<(), Aborted> {
        self.added_count += 1;
        self.check_stop()?;
        self.added_paths.push(path.render(self.dialect));
        sparse::place(&mut self.added, path.segments(), new.clone(), true);
        if let Some(ops) = self.patch.as_mut() {
            ops.push(PatchOperation::Add { path: path.clone(), value: new.clone() });
        }
        if merge {
            sparse::place(&mut self.merge, path.segments(), new.clone(), false);
        }
        Ok(())
    }

    /// Writes a whole value into the merge patch.
    pub(crate) fn record_merge(&mut self, path: &Path, value: Node) {
        sparse::place(&mut self.merge, path.segments(), value, false);
    }

    fn finish(self, new: &Node, outcome: Result<Node, Aborted>) -> Diff {
        let stopped_early = outcome.is_err();
        let merge_patch = if self.options.skip_json_merge_patch() {
            None
        } else {
            Some(self.merge.unwrap_or_else(|| match new {
                Node::Null => Node::Null,
                _ => Node::Object(crate::node::Object::new()),
            }))
        };
        let diff = Diff {
            removed: self.removed,
            added: self.added,
            modified_original: self.modified_original,
            modified_new: self.modified_new,
            removed_paths: self.removed_paths,
            added_paths: self.added_paths,
            modified_paths: self.modified_paths,
            removed_count: self.removed_count,
            added_count: self.added_count,
            modified_count: self.modified_count,
            rearranged: outcome.unwrap_or(Node::Null),
            patch: self.patch.map(Patch::from),
            merge_patch,
            stopped_early,
        };
        if stopped_early {
            debug!(options = %self.options, "diff stopped at first difference");
        }
        debug!(
            removed = diff.removed_count,
            added = diff.added_count,
            modified = diff.modified_count,
            "diff complete"
        );
        diff
    }
}

/// Computes the diff between `original` and `new`.
pub(crate) fn diff_nodes(original: &Node, new: &Node, options: &DiffOptions) -> Diff {
    let mut acc = Collector::new(options);
    let merge = !options.skip_json_merge_patch();
    let outcome = diff_impl(original, new, &Path::new(), merge, &mut acc);
    acc.finish(new, outcome)
}

/// Compares one pair of positions and returns the reconciled new value.
///
/// `merge` is false below positions whose merge patch entry is written
/// wholesale.
pub(crate) fn diff_impl(
    original: &Node,
    new: &Node,
    path: &Path,
    merge: bool,
    acc: &mut Collector<'_>,
) -> Result<Node, Aborted> {
    match (original, new) {
        (Node::Object(lhs), Node::Object(rhs)) => {
            object::diff_objects(lhs, rhs, path, merge, acc).map(Node::Object)
        }
        (Node::Array(lhs), Node::Array(rhs)) => {
            list::diff_lists(lhs, rhs, path, merge, acc).map(Node::Array)
        }
        _ => primitives::diff_leaf(original, new, path, merge, acc),
    }
}
