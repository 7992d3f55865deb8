//! Structural JSON diff.
//!
//! `jsondiff-core` compares an original document with a new one in a single
//! traversal and reports the result in several complementary shapes: sparse
//! trees of removed, added and modified values, rendered path lists with
//! counts, a JSON Patch (RFC 6902) and a JSON Merge Patch (RFC 7386). It can
//! also import, export and apply JSON Patch documents.
//!
//! ```
//! use jsondiff_core::{DiffOptions, Node};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let base = Node::from_json_str(r#"{"name":"jsondiff","version":1,"tags":["a"]}"#)?;
//!     let target = Node::from_json_str(r#"{"name":"jsondiff","version":2,"tags":["a","b"]}"#)?;
//!     let diff = base.diff(&target, &DiffOptions::default());
//!     assert_eq!(diff.modified_paths(), ["/version"]);
//!     assert_eq!(diff.added_paths(), ["/tags/1"]);
//!
//!     let patch = diff.patch().expect("patch output enabled");
//!     assert_eq!(base.apply_patch(patch)?, target);
//!
//!     let merge = diff.merge_patch().expect("merge patch output enabled");
//!     assert_eq!(base.apply_merge_patch(merge), target);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod diff;
mod error;
pub mod merge;
mod node;
mod number;
mod options;
pub mod patch;

pub use diff::{Diff, Path, PathSegment};
pub use error::{CanonicalizeError, OptionsError, PatchError, PatchParseError};
pub use node::{Node, Object};
pub use number::Number;
pub use options::{DiffOptions, PathDialect};
pub use patch::{Patch, PatchOperation};

/// Returns the semantic version of the `jsondiff-core` crate.
///
/// ```
/// assert!(!jsondiff_core::version().is_empty());
/// ```
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
