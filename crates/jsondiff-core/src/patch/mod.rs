//! JSON Patch (RFC 6902) operations.
//!
//! Operations are imported from and exported to their wire form, an array
//! of flat objects. Paths on the wire always use the pointer dialect.

mod apply;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use crate::{diff::Path, node::Object, Node, PatchError};

/// A single patch operation.
#[derive(Clone, Debug, PartialEq)]
pub enum PatchOperation {
    /// Inserts or overwrites the value at `path`.
    Add {
        /// Target location.
        path: Path,
        /// Value to insert.
        value: Node,
    },
    /// Deletes the value at `path`.
    Remove {
        /// Target location.
        path: Path,
    },
    /// Overwrites the existing value at `path`.
    Replace {
        /// Target location.
        path: Path,
        /// Replacement value.
        value: Node,
    },
    /// Removes the value at `from` and adds it at `path`.
    Move {
        /// Source location.
        from: Path,
        /// Target location.
        path: Path,
    },
    /// Adds a copy of the value at `from` at `path`.
    Copy {
        /// Source location.
        from: Path,
        /// Target location.
        path: Path,
    },
    /// Asserts that the value at `path` equals `value`.
    Test {
        /// Tested location.
        path: Path,
        /// Expected value.
        value: Node,
    },
}

impl PatchOperation {
    /// The wire name of the operation.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Replace { .. } => "replace",
            Self::Move { .. } => "move",
            Self::Copy { .. } => "copy",
            Self::Test { .. } => "test",
        }
    }

    /// The destination location of the operation.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Add { path, .. }
            | Self::Remove { path }
            | Self::Replace { path, .. }
            | Self::Move { path, .. }
            | Self::Copy { path, .. }
            | Self::Test { path, .. } => path,
        }
    }

    /// Applies this single operation to `doc`.
    ///
    /// A failed operation leaves `doc` unchanged.
    pub fn apply(&self, doc: &mut Node) -> Result<(), PatchError> {
        match self {
            Self::Add { path, value } => apply::add(doc, path, value.clone()),
            Self::Remove { path } => apply::remove(doc, path).map(drop),
            Self::Replace { path, value } => apply::replace(doc, path, value.clone()),
            Self::Move { from, path } => apply::move_op(doc, from, path),
            Self::Copy { from, path } => apply::copy(doc, from, path),
            Self::Test { path, value } => apply::test(doc, path, value),
        }
    }

    /// Encodes the operation as its wire object.
    #[must_use]
    pub fn to_node(&self) -> Node {
        let mut object = Object::with_capacity(3);
        object.insert("op".to_string(), Node::String(self.name().to_string()));
        object.insert("path".to_string(), Node::String(self.path().to_pointer()));
        match self {
            Self::Add { value, .. } | Self::Replace { value, .. } | Self::Test { value, .. } => {
                object.insert("value".to_string(), value.clone());
            }
            Self::Move { from, .. } | Self::Copy { from, .. } => {
                object.insert("from".to_string(), Node::String(from.to_pointer()));
            }
            Self::Remove { .. } => {}
        }
        Node::Object(object)
    }

    /// Decodes a wire object. `index` is the operation's position in the patch.
    fn from_node(index: usize, node: &Node) -> Result<Self, PatchError> {
        let Node::Object(object) = node else {
            return Err(PatchError::InvalidOperation { index });
        };
        let op = object.get("op").ok_or(PatchError::MissingField { field: "op" })?;
        let path = read_pointer(object, "path")?.ok_or(PatchError::MissingField { field: "path" })?;
        let Node::String(op) = op else {
            return Err(PatchError::UnknownOperation { op: op.to_json_string() });
        };

        let value = || -> Result<Node, PatchError> {
            object.get("value").cloned().ok_or(PatchError::MissingField { field: "value" })
        };
        let from = || -> Result<Path, PatchError> {
            read_pointer(object, "from")?.ok_or(PatchError::MissingField { field: "from" })
        };

        Ok(match op.as_str() {
            "add" => Self::Add { path, value: value()? },
            "remove" => Self::Remove { path },
            "replace" => Self::Replace { path, value: value()? },
            "move" => Self::Move { from: from()?, path },
            "copy" => Self::Copy { from: from()?, path },
            "test" => Self::Test { path, value: value()? },
            other => return Err(PatchError::UnknownOperation { op: other.to_string() }),
        })
    }
}

fn read_pointer(object: &Object, field: &'static str) -> Result<Option<Path>, PatchError> {
    match object.get(field) {
        None => Ok(None),
        Some(Node::String(pointer)) => Path::from_pointer(pointer).map(Some),
        Some(other) => Err(PatchError::InvalidPointer {
            pointer: other.to_json_string(),
            reason: "must be a string",
        }),
    }
}

impl fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_node(), f)
    }
}

/// An ordered list of patch operations.
///
/// ```
/// # use jsondiff_core::{Node, Patch};
/// let patch = Patch::from_json_str(r#"[{"op":"copy","path":"/1","from":"/0"}]"#)?;
/// let mut doc = Node::from_json_str(r#"["AAA"]"#)?;
/// patch.apply(&mut doc)?;
/// assert_eq!(doc.to_json_string(), r#"["AAA","AAA"]"#);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch(Vec<PatchOperation>);

impl Patch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports a patch from its wire form.
    ///
    /// The whole import fails on the first malformed operation.
    ///
    /// ```
    /// # use jsondiff_core::{Node, Patch, PatchError};
    /// let missing = Node::from_json_str(r#"[{"op":"add","path":"/x"}]"#).unwrap();
    /// assert_eq!(Patch::import(&missing), Err(PatchError::MissingField { field: "value" }));
    /// ```
    pub fn import(node: &Node) -> Result<Self, PatchError> {
        let Node::Array(items) = node else {
            return Err(PatchError::NotAnArray { found: node.type_name() });
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| PatchOperation::from_node(index, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Exports the patch to its wire form.
    #[must_use]
    pub fn export(&self) -> Node {
        Node::Array(self.0.iter().map(PatchOperation::to_node).collect())
    }

    /// Parses and imports a patch from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self, crate::PatchParseError> {
        let node = Node::from_json_str(input)?;
        Ok(Self::import(&node)?)
    }

    /// Encodes the patch as compact JSON text.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.export().to_json_string()
    }

    /// Appends an operation.
    pub fn push(&mut self, operation: PatchOperation) {
        self.0.push(operation);
    }

    /// Number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether the patch holds no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the operations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PatchOperation> {
        self.0.iter()
    }

    /// Applies every operation in order to `doc`.
    ///
    /// Stops at the first failing operation. Operations before it stay
    /// applied; snapshot `doc` beforehand when atomicity is needed.
    pub fn apply(&self, doc: &mut Node) -> Result<(), PatchError> {
        for (index, operation) in self.0.iter().enumerate() {
            trace!(index, op = operation.name(), path = %operation.path(), "applying patch operation");
            if let Err(err) = operation.apply(doc) {
                debug!(index, op = operation.name(), error = %err, "patch aborted");
                return Err(err);
            }
        }
        Ok(())
    }
}

impl From<Vec<PatchOperation>> for Patch {
    fn from(value: Vec<PatchOperation>) -> Self {
        Self(value)
    }
}

impl FromIterator<PatchOperation> for Patch {
    fn from_iter<T: IntoIterator<Item = PatchOperation>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a PatchOperation;
    type IntoIter = std::slice::Iter<'a, PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Patch {
    type Item = PatchOperation;
    type IntoIter = std::vec::IntoIter<PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for Patch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.export().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Patch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let node = Node::deserialize(deserializer)?;
        Self::import(&node).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(json: &str) -> Result<Patch, PatchError> {
        Patch::import(&Node::from_json_str(json).unwrap())
    }

    #[test]
    fn import_rejects_non_array() {
        assert_eq!(import("{}"), Err(PatchError::NotAnArray { found: "object" }));
    }

    #[test]
    fn import_rejects_non_object_operation() {
        assert_eq!(
            import(r#"[{"op":"remove","path":"/a"},1]"#),
            Err(PatchError::InvalidOperation { index: 1 })
        );
    }

    #[test]
    fn import_reports_missing_fields() {
        assert_eq!(import(r#"[{"path":"/a"}]"#), Err(PatchError::MissingField { field: "op" }));
        assert_eq!(import(r#"[{"op":"remove"}]"#), Err(PatchError::MissingField { field: "path" }));
        assert_eq!(
            import(r#"[{"op":"replace","path":"/a"}]"#),
            Err(PatchError::MissingField { field: "value" })
        );
        assert_eq!(
            import(r#"[{"op":"move","path":"/a"}]"#),
            Err(PatchError::MissingField { field: "from" })
        );
    }

    #[test]
    fn import_rejects_unknown_op() {
        assert_eq!(
            import(r#"[{"op":"wat","path":"/x"}]"#),
            Err(PatchError::UnknownOperation { op: "wat".to_string() })
        );
        assert_eq!(
            import(r#"[{"op":7,"path":"/x"}]"#),
            Err(PatchError::UnknownOperation { op: "7".to_string() })
        );
    }

    #[test]
    fn import_rejects_malformed_pointer() {
        let err = import(r#"[{"op":"remove","path":"a"}]"#).unwrap_err();
        assert!(matches!(err, PatchError::InvalidPointer { .. }));
        let err = import(r#"[{"op":"remove","path":1}]"#).unwrap_err();
        assert!(matches!(err, PatchError::InvalidPointer { reason: "must be a string", .. }));
    }

    #[test]
    fn null_value_is_present() {
        let patch = import(r#"[{"op":"add","path":"/a","value":null}]"#).unwrap();
        assert_eq!(patch.len(), 1);
    }

    #[test]
    fn export_emits_only_relevant_fields() {
        let patch = import(
            r#"[{"op":"remove","path":"/a","value":1},{"op":"copy","from":"/b","path":"/c"}]"#,
        )
        .unwrap();
        assert_eq!(
            patch.to_json_string(),
            r#"[{"op":"remove","path":"/a"},{"op":"copy","path":"/c","from":"/b"}]"#
        );
    }

    #[test]
    fn serde_uses_wire_form() {
        let text = r#"[{"op":"test","path":"/a~1b","value":[1]}]"#;
        let patch: Patch = serde_json::from_str(text).unwrap();
        assert_eq!(serde_json::to_string(&patch).unwrap(), text);
        assert!(serde_json::from_str::<Patch>(r#"[{"op":"nope","path":""}]"#).is_err());
    }

    #[test]
    fn failed_batch_keeps_earlier_operations() {
        let patch = import(
            r#"[{"op":"add","path":"/a","value":1},{"op":"test","path":"/a","value":2},{"op":"add","path":"/b","value":3}]"#,
        )
        .unwrap();
        let mut doc = Node::from_json_str("{}").unwrap();
        let err = patch.apply(&mut doc).unwrap_err();
        assert_eq!(
            err,
            PatchError::TestFailed {
                path: "/a".to_string(),
                expected: "2".to_string(),
                actual: "1".to_string(),
            }
        );
        assert_eq!(doc.to_json_string(), r#"{"a":1}"#);
    }

    #[test]
    fn reimported_array_patch_equals_original() {
        let base = Node::from_json_str(r#"{"list":[1,2,3]}"#).unwrap();
        let target = Node::from_json_str(r#"{"list":[2]}"#).unwrap();
        let diff = base.diff(&target, &crate::DiffOptions::default());
        let patch = diff.patch().unwrap();
        assert_eq!(&Patch::import(&patch.export()).unwrap(), patch);
    }
}
