use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{PatchError, PathDialect};

/// Represents a single element within a path.
///
/// A segment either names an object member or an array position. Pointers
/// parsed from text only produce keys; numeric keys are read as indices when
/// they are resolved against an array. Segments compare by their reference
/// token, so `Key("2")` equals `Index(2)`.
///
/// ```
/// # use jsondiff_core::diff::PathSegment;
/// let key = PathSegment::key("name");
/// let index = PathSegment::index(2);
/// assert!(matches!(key, PathSegment::Key(_)));
/// assert!(matches!(index, PathSegment::Index(2)));
/// ```
#[derive(Clone, Debug)]
pub enum PathSegment {
    /// Object key lookup.
    Key(String),
    /// Array index lookup.
    Index(usize),
}

impl PathSegment {
    /// Creates a key segment.
    #[must_use]
    pub fn key<S>(value: S) -> Self
    where
        S: Into<String>,
    {
        Self::Key(value.into())
    }

    /// Creates an index segment.
    #[must_use]
    pub fn index(value: usize) -> Self {
        Self::Index(value)
    }

    fn token(&self) -> Cow<'_, str> {
        match self {
            Self::Key(key) => Cow::Borrowed(key),
            Self::Index(index) => Cow::Owned(index.to_string()),
        }
    }
}

impl PartialEq for PathSegment {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Index(lhs), Self::Index(rhs)) => lhs == rhs,
            _ => self.token() == other.token(),
        }
    }
}

impl Eq for PathSegment {}

impl Hash for PathSegment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token().hash(state);
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Escapes a reference token: `~` becomes `~0`, then `/` becomes `~1`.
///
/// ```
/// # use jsondiff_core::diff::escape_segment;
/// assert_eq!(escape_segment("a/b~c"), "a~1b~0c");
/// ```
#[must_use]
pub fn escape_segment(segment: &str) -> String {
    if !segment.contains(['~', '/']) {
        return segment.to_string();
    }
    segment.replace('~', "~0").replace('/', "~1")
}

/// Reverses [`escape_segment`], rejecting `~` not followed by `0` or `1`.
fn unescape_segment(pointer: &str, token: &str) -> Result<String, PatchError> {
    if !token.contains('~') {
        return Ok(token.to_string());
    }
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(ch) = chars.next() {
        if ch != '~' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => {
                return Err(PatchError::InvalidPointer {
                    pointer: pointer.to_string(),
                    reason: "'~' must be followed by '0' or '1'",
                });
            }
        }
    }
    Ok(out)
}

fn percent_encode_into(out: &mut String, segment: &str) {
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            // infallible for String
            let _ = write!(out, "%{byte:02X}");
        }
    }
}

/// Represents the location of a value within a document.
///
/// Paths are derived per recursion step with [`Path::with_segment`], so
/// sibling branches never observe each other's segments.
///
/// ```
/// # use jsondiff_core::diff::{Path, PathSegment};
/// # use jsondiff_core::PathDialect;
/// let path = Path::new()
///     .with_segment(PathSegment::key("c%d"))
///     .with_segment(PathSegment::index(0));
/// assert_eq!(path.render(PathDialect::Pointer), "/c%d/0");
/// assert_eq!(path.render(PathDialect::UriFragment), "#/c%25d/0");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// Creates an empty path addressing the document root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a pointer string such as `/a/0/b~1c`.
    ///
    /// The empty string addresses the root. Every token is returned as a key.
    ///
    /// ```
    /// # use jsondiff_core::diff::{Path, PathSegment};
    /// let path = Path::from_pointer("/a~1b/0")?;
    /// assert_eq!(path.segments(), [PathSegment::key("a/b"), PathSegment::key("0")]);
    /// assert!(Path::from_pointer("a").is_err());
    /// # Ok::<(), jsondiff_core::PatchError>(())
    /// ```
    pub fn from_pointer(pointer: &str) -> Result<Self, PatchError> {
        if pointer.is_empty() {
            return Ok(Self::new());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(PatchError::InvalidPointer {
                pointer: pointer.to_string(),
                reason: "must be empty or start with '/'",
            });
        };
        rest.split('/')
            .map(|token| unescape_segment(pointer, token).map(PathSegment::Key))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Appends a new segment, returning the extended path.
    #[must_use]
    pub fn with_segment(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment);
        Self(segments)
    }

    /// Returns the underlying segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether the path addresses the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits the path into its parent and last segment.
    #[must_use]
    pub fn split_last(&self) -> Option<(&[PathSegment], &PathSegment)> {
        self.0.split_last().map(|(last, parent)| (parent, last))
    }

    /// Indicates whether `other` lies strictly below this path.
    ///
    /// `Index(1)` and `Key("1")` address the same position.
    ///
    /// ```
    /// # use jsondiff_core::diff::Path;
    /// let parent = Path::from_pointer("/a")?;
    /// assert!(parent.is_proper_prefix_of(&Path::from_pointer("/a/b")?));
    /// assert!(!parent.is_proper_prefix_of(&Path::from_pointer("/a")?));
    /// assert!(!parent.is_proper_prefix_of(&Path::from_pointer("/ab")?));
    /// # Ok::<(), jsondiff_core::PatchError>(())
    /// ```
    #[must_use]
    pub fn is_proper_prefix_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len()
            && self.0.iter().zip(&other.0).all(|(lhs, rhs)| lhs == rhs)
    }

    /// Renders the path in the requested dialect.
    ///
    /// The root renders as `""` in the pointer dialect and `"#"` in the URI
    /// fragment dialect.
    #[must_use]
    pub fn render(&self, dialect: PathDialect) -> String {
        let mut out = String::new();
        if dialect == PathDialect::UriFragment {
            out.push('#');
        }
        for segment in &self.0 {
            out.push('/');
            let escaped = escape_segment(&segment.to_string());
            match dialect {
                PathDialect::Pointer => out.push_str(&escaped),
                PathDialect::UriFragment => percent_encode_into(&mut out, &escaped),
            }
        }
        out
    }

    /// Renders the path as a pointer string.
    #[must_use]
    pub fn to_pointer(&self) -> String {
        self.render(PathDialect::Pointer)
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(value: Vec<PathSegment>) -> Self {
        Self(value)
    }
}

impl From<PathSegment> for Path {
    fn from(value: PathSegment) -> Self {
        Self(vec![value])
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_pointer())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pointer = String::deserialize(deserializer)?;
        Self::from_pointer(&pointer).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: Vec<PathSegment>) -> Path {
        Path::from(segments)
    }

    #[test]
    fn root_renders_per_dialect() {
        assert_eq!(Path::new().render(PathDialect::Pointer), "");
        assert_eq!(Path::new().render(PathDialect::UriFragment), "#");
    }

    #[test]
    fn pointer_escapes_tilde_before_slash() {
        let p = path(vec![PathSegment::key("~1"), PathSegment::key("a/b")]);
        assert_eq!(p.render(PathDialect::Pointer), "/~01/a~1b");
    }

    #[test]
    fn fragment_percent_encodes_after_escaping() {
        let p = path(vec![PathSegment::key("a b/c"), PathSegment::key("é")]);
        assert_eq!(p.render(PathDialect::UriFragment), "#/a%20b~1c/%C3%A9");
    }

    #[test]
    fn with_segment_leaves_parent_untouched() {
        let parent = Path::new().with_segment(PathSegment::key("a"));
        let left = parent.with_segment(PathSegment::index(0));
        let right = parent.with_segment(PathSegment::key("b"));
        assert_eq!(parent.to_pointer(), "/a");
        assert_eq!(left.to_pointer(), "/a/0");
        assert_eq!(right.to_pointer(), "/a/b");
    }

    #[test]
    fn parse_round_trips_escaped_tokens() {
        let p = Path::from_pointer("/~01/a~1b/").unwrap();
        assert_eq!(
            p.segments(),
            [PathSegment::key("~1"), PathSegment::key("a/b"), PathSegment::key("")]
        );
        assert_eq!(p.to_pointer(), "/~01/a~1b/");
    }

    #[test]
    fn parse_rejects_bad_escape() {
        let err = Path::from_pointer("/a~2").unwrap_err();
        assert!(matches!(err, PatchError::InvalidPointer { .. }));
        let err = Path::from_pointer("/a~").unwrap_err();
        assert!(matches!(err, PatchError::InvalidPointer { .. }));
    }

    #[test]
    fn prefix_compares_index_and_key_text() {
        let parent = path(vec![PathSegment::index(1)]);
        let child = Path::from_pointer("/1/x").unwrap();
        assert!(parent.is_proper_prefix_of(&child));
    }

    #[test]
    fn serde_uses_pointer_text() {
        let p = path(vec![PathSegment::key("foo"), PathSegment::index(3)]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"/foo/3\"");
        let decoded: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.to_pointer(), "/foo/3");
    }

    #[test]
    fn index_and_numeric_key_are_equal() {
        use std::collections::HashSet;

        assert_eq!(PathSegment::index(0), PathSegment::key("0"));
        assert_ne!(PathSegment::index(0), PathSegment::key("00"));
        assert_eq!(Path::from_pointer("/a/1").unwrap(), path(vec![PathSegment::key("a"), PathSegment::index(1)]));

        let set: HashSet<_> = [PathSegment::index(3), PathSegment::key("3")].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
