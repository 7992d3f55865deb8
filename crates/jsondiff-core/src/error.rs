use thiserror::Error;

/// Errors that can occur while canonicalizing external data into [`Node`](crate::Node).
#[derive(Debug, Error)]
pub enum CanonicalizeError {
    /// The provided JSON input was invalid.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The provided YAML input was invalid.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// YAML maps may only contain string keys.
    #[error("unsupported YAML key type: {found}")]
    NonStringYamlKey {
        /// A description of the key that triggered the error.
        found: String,
    },
    /// YAML tags have no JSON counterpart and are rejected.
    #[error("unsupported YAML tag: {tag}")]
    UnsupportedYamlTag {
        /// The tag identifier encountered in the document.
        tag: String,
    },
    /// Attempted to construct a [`Number`](crate::Number) that is not finite.
    #[error("non-finite number encountered: {value}")]
    NotFinite {
        /// The offending numeric value.
        value: f64,
    },
}

/// Errors emitted when constructing [`DiffOptions`](crate::DiffOptions).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    /// The option name is not one of the recognised flags.
    #[error("unknown diff option: {name}")]
    UnknownOption {
        /// The name as it was supplied.
        name: String,
    },
}

/// Errors raised while importing or applying a JSON Patch.
///
/// Import failures reject the whole patch document. Apply failures stop at the
/// failing operation; earlier operations of the same batch stay applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    /// The patch document is not an array.
    #[error("patch document must be an array of operations, found {found}")]
    NotAnArray {
        /// JSON type name of the rejected document.
        found: &'static str,
    },
    /// An element of the patch document is not an object.
    #[error("operation {index} must be an object")]
    InvalidOperation {
        /// Position of the element inside the patch document.
        index: usize,
    },
    /// A required member is absent from an operation.
    #[error("missing \"{field}\" in operation data")]
    MissingField {
        /// Name of the absent member.
        field: &'static str,
    },
    /// The `op` member names an unsupported operation.
    #[error("unknown \"op\": {op}")]
    UnknownOperation {
        /// The operation name as supplied.
        op: String,
    },
    /// A pointer string could not be parsed.
    #[error("invalid JSON pointer {pointer:?}: {reason}")]
    InvalidPointer {
        /// The rejected pointer text.
        pointer: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// The target location does not exist.
    #[error("path {path:?} not found")]
    PathNotFound {
        /// Pointer of the missing location.
        path: String,
    },
    /// A token used against an array is not a valid index.
    #[error("invalid array index {token:?} in {path:?}")]
    InvalidArrayIndex {
        /// Pointer being resolved.
        path: String,
        /// The offending token.
        token: String,
    },
    /// An array index lies outside the array.
    #[error("index {index} out of bounds for array of length {len} at {path:?}")]
    IndexOutOfBounds {
        /// Pointer being resolved.
        path: String,
        /// Requested index.
        index: usize,
        /// Current length of the array.
        len: usize,
    },
    /// The parent of the target location is a scalar.
    #[error("cannot address a child of {found} at {path:?}")]
    NotAContainer {
        /// Pointer of the scalar parent.
        path: String,
        /// JSON type name of the parent.
        found: &'static str,
    },
    /// The document root cannot be removed.
    #[error("cannot remove the document root")]
    CannotRemoveRoot,
    /// A location cannot be moved into one of its own children.
    #[error("cannot move {from:?} into its child {path:?}")]
    MoveIntoChild {
        /// Source pointer.
        from: String,
        /// Destination pointer.
        path: String,
    },
    /// A `test` operation found a different value.
    #[error("test failed at {path:?}: expected {expected}, found {actual}")]
    TestFailed {
        /// Pointer of the tested location.
        path: String,
        /// Expected value as JSON text.
        expected: String,
        /// Actual value as JSON text.
        actual: String,
    },
}

/// Errors raised while reading a patch from JSON text.
#[derive(Debug, Error)]
pub enum PatchParseError {
    /// The text is not valid JSON.
    #[error(transparent)]
    Decode(#[from] CanonicalizeError),
    /// The document is not a valid patch.
    #[error(transparent)]
    Patch(#[from] PatchError),
}
