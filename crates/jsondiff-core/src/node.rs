use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::{CanonicalizeError, Diff, DiffOptions, Number, Patch, PatchError};

/// Ordered object representation: member order is insertion order.
pub type Object = IndexMap<String, Node>;

/// The JSON data model used by the diff engine.
///
/// Objects keep their members in insertion order; two objects with the same
/// members in a different order still compare equal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "JsonValue", into = "JsonValue")]
pub enum Node {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number, kept as decoded.
    Number(Number),
    /// JSON string.
    String(String),
    /// JSON array.
    Array(Vec<Node>),
    /// JSON object with insertion-ordered members.
    Object(Object),
}

impl Node {
    /// Parses a JSON string into a node.
    ///
    /// ```
    /// # use jsondiff_core::Node;
    /// let node = Node::from_json_str("{\"hello\":\"world\"}")?;
    /// assert!(node.is_object());
    /// # Ok::<(), jsondiff_core::CanonicalizeError>(())
    /// ```
    pub fn from_json_str(input: &str) -> Result<Self, CanonicalizeError> {
        let value: JsonValue = serde_json::from_str(input)?;
        Ok(Self::from_json_value(value))
    }

    /// Parses a YAML string into a node.
    ///
    /// ```
    /// # use jsondiff_core::Node;
    /// let node = Node::from_yaml_str("---\nanswer: 42\n")?;
    /// assert!(node.is_object());
    /// # Ok::<(), jsondiff_core::CanonicalizeError>(())
    /// ```
    pub fn from_yaml_str(input: &str) -> Result<Self, CanonicalizeError> {
        let value: YamlValue = serde_yaml::from_str(input)?;
        Self::from_yaml_value(value)
    }

    /// Converts a serde JSON value into a [`Node`].
    #[must_use]
    pub fn from_json_value(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(v) => Self::Bool(v),
            JsonValue::Number(num) => Self::Number(Number::from(num)),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(values) => {
                Self::Array(values.into_iter().map(Self::from_json_value).collect())
            }
            JsonValue::Object(map) => Self::Object(
                map.into_iter().map(|(key, value)| (key, Self::from_json_value(value))).collect(),
            ),
        }
    }

    fn from_yaml_value(value: YamlValue) -> Result<Self, CanonicalizeError> {
        match value {
            YamlValue::Null => Ok(Self::Null),
            YamlValue::Bool(v) => Ok(Self::Bool(v)),
            YamlValue::Number(num) => {
                if let Some(i) = num.as_i64() {
                    return Ok(Self::Number(Number::from(i)));
                }
                if let Some(u) = num.as_u64() {
                    return Ok(Self::Number(Number::from(u)));
                }
                let f = num.as_f64().unwrap_or(f64::NAN);
                Ok(Self::Number(Number::from_f64(f)?))
            }
            YamlValue::String(s) => Ok(Self::String(s)),
            YamlValue::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for value in seq {
                    items.push(Self::from_yaml_value(value)?);
                }
                Ok(Self::Array(items))
            }
            YamlValue::Mapping(map) => {
                let mut object = Object::with_capacity(map.len());
                for (key, value) in map {
                    let key = match key {
                        YamlValue::String(s) => s,
                        other => {
                            return Err(CanonicalizeError::NonStringYamlKey {
                                found: format!("{other:?}"),
                            });
                        }
                    };
                    object.insert(key, Self::from_yaml_value(value)?);
                }
                Ok(Self::Object(object))
            }
            YamlValue::Tagged(tagged) => {
                Err(CanonicalizeError::UnsupportedYamlTag { tag: tagged.tag.to_string() })
            }
        }
    }

    /// Converts the node into a serde JSON value.
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(*v),
            Self::Number(n) => JsonValue::Number(n.as_json_number().clone()),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Array(values) => JsonValue::Array(values.iter().map(Self::to_json_value).collect()),
            Self::Object(map) => JsonValue::Object(
                map.iter().map(|(key, value)| (key.clone(), value.to_json_value())).collect(),
            ),
        }
    }

    /// Encodes the node as compact JSON text.
    ///
    /// ```
    /// # use jsondiff_core::Node;
    /// let node = Node::from_json_str("{ \"b\": 1, \"a\": [true, null] }")?;
    /// assert_eq!(node.to_json_string(), "{\"b\":1,\"a\":[true,null]}");
    /// # Ok::<(), jsondiff_core::CanonicalizeError>(())
    /// ```
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.to_json_value().to_string()
    }

    /// Returns a short name of the JSON type, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Indicates whether the node is an array or an object.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Indicates whether the node is an object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Indicates whether the node is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Indicates whether the node is `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Computes the structural diff between this node (original) and `other` (new).
    ///
    /// ```
    /// # use jsondiff_core::{DiffOptions, Node};
    /// let lhs = Node::from_json_str("{\"a\":1}")?;
    /// let rhs = Node::from_json_str("{\"a\":2}")?;
    /// let diff = lhs.diff(&rhs, &DiffOptions::default());
    /// assert_eq!(diff.modified_paths(), ["/a"]);
    /// # Ok::<(), jsondiff_core::CanonicalizeError>(())
    /// ```
    #[must_use]
    pub fn diff(&self, other: &Self, options: &DiffOptions) -> Diff {
        crate::diff::diff_nodes(self, other, options)
    }

    /// Applies a JSON Patch to a copy of this node and returns the result.
    ///
    /// ```
    /// # use jsondiff_core::{DiffOptions, Node};
    /// let base = Node::from_json_str("[1,2,3]")?;
    /// let target = Node::from_json_str("[1,4]")?;
    /// let diff = base.diff(&target, &DiffOptions::default());
    /// let patched = base.apply_patch(diff.patch().expect("patch generated"))?;
    /// assert_eq!(patched, target);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn apply_patch(&self, patch: &Patch) -> Result<Self, PatchError> {
        let mut document = self.clone();
        patch.apply(&mut document)?;
        Ok(document)
    }

    /// Applies a JSON Merge Patch to a copy of this node and returns the result.
    ///
    /// ```
    /// # use jsondiff_core::Node;
    /// let base = Node::from_json_str("{\"a\":1,\"b\":2}")?;
    /// let merge = Node::from_json_str("{\"a\":null,\"c\":3}")?;
    /// assert_eq!(base.apply_merge_patch(&merge).to_json_string(), "{\"b\":2,\"c\":3}");
    /// # Ok::<(), jsondiff_core::CanonicalizeError>(())
    /// ```
    #[must_use]
    pub fn apply_merge_patch(&self, merge_patch: &Self) -> Self {
        let mut document = self.clone();
        crate::merge::apply_merge_patch(&mut document, merge_patch);
        document
    }
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        Self::from_json_value(value)
    }
}

impl From<Node> for JsonValue {
    fn from(node: Node) -> Self {
        node.to_json_value()
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json_string())
    }
}
