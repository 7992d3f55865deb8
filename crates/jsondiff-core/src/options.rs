use std::fmt;

use serde::{Deserialize, Serialize};

use crate::OptionsError;

/// Selects how recorded paths are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathDialect {
    /// JSON String Representation, e.g. `/c%d`.
    #[default]
    Pointer,
    /// URI Fragment Identifier Representation, e.g. `#/c%25d`.
    UriFragment,
}

/// Configuration knobs passed to the diff entry point.
///
/// All options are off by default, which yields a full diff with JSON Patch
/// and JSON Merge Patch output and pointer-style paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    rearrange_arrays: bool,
    stop_on_diff: bool,
    uri_fragment_id: bool,
    skip_json_patch: bool,
    skip_json_merge_patch: bool,
}

impl DiffOptions {
    /// Name of the array rearrangement option.
    pub const REARRANGE_ARRAYS: &'static str = "REARRANGE_ARRAYS";
    /// Name of the stop-on-first-difference option.
    pub const STOP_ON_DIFF: &'static str = "STOP_ON_DIFF";
    /// Name of the URI fragment path dialect option.
    pub const JSON_URI_FRAGMENT_ID: &'static str = "JSON_URI_FRAGMENT_ID";
    /// Name of the option disabling JSON Patch output.
    pub const SKIP_JSON_PATCH: &'static str = "SKIP_JSON_PATCH";
    /// Name of the option disabling JSON Merge Patch output.
    pub const SKIP_JSON_MERGE_PATCH: &'static str = "SKIP_JSON_MERGE_PATCH";

    /// Builds options from their canonical names.
    ///
    /// ```
    /// # use jsondiff_core::DiffOptions;
    /// let opts = DiffOptions::from_names(["REARRANGE_ARRAYS", "SKIP_JSON_PATCH"])?;
    /// assert!(opts.rearrange_arrays());
    /// assert!(opts.skip_json_patch());
    /// assert!(DiffOptions::from_names(["FAST"]).is_err());
    /// # Ok::<(), jsondiff_core::OptionsError>(())
    /// ```
    pub fn from_names<I, S>(names: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for name in names {
            let name = name.as_ref();
            match name.trim() {
                Self::REARRANGE_ARRAYS => options.rearrange_arrays = true,
                Self::STOP_ON_DIFF => options.stop_on_diff = true,
                Self::JSON_URI_FRAGMENT_ID => options.uri_fragment_id = true,
                Self::SKIP_JSON_PATCH => options.skip_json_patch = true,
                Self::SKIP_JSON_MERGE_PATCH => options.skip_json_merge_patch = true,
                _ => return Err(OptionsError::UnknownOption { name: name.to_string() }),
            }
        }
        Ok(options)
    }

    /// Indicates whether arrays of objects are reordered to match the original.
    #[must_use]
    pub fn rearrange_arrays(&self) -> bool {
        self.rearrange_arrays
    }

    /// Indicates whether the traversal stops at the first difference.
    #[must_use]
    pub fn stop_on_diff(&self) -> bool {
        self.stop_on_diff
    }

    /// Indicates whether paths use the URI fragment dialect.
    #[must_use]
    pub fn uri_fragment_id(&self) -> bool {
        self.uri_fragment_id
    }

    /// Indicates whether JSON Patch generation is disabled.
    #[must_use]
    pub fn skip_json_patch(&self) -> bool {
        self.skip_json_patch
    }

    /// Indicates whether JSON Merge Patch generation is disabled.
    #[must_use]
    pub fn skip_json_merge_patch(&self) -> bool {
        self.skip_json_merge_patch
    }

    /// Returns the dialect used for the recorded path lists.
    ///
    /// ```
    /// # use jsondiff_core::{DiffOptions, PathDialect};
    /// assert_eq!(DiffOptions::default().path_dialect(), PathDialect::Pointer);
    /// let opts = DiffOptions::default().with_uri_fragment_id(true);
    /// assert_eq!(opts.path_dialect(), PathDialect::UriFragment);
    /// ```
    #[must_use]
    pub fn path_dialect(&self) -> PathDialect {
        if self.uri_fragment_id {
            PathDialect::UriFragment
        } else {
            PathDialect::Pointer
        }
    }

    /// Enables or disables array rearrangement.
    #[must_use]
    pub fn with_rearrange_arrays(mut self, enabled: bool) -> Self {
        self.rearrange_arrays = enabled;
        self
    }

    /// Enables or disables stopping at the first difference.
    ///
    /// Counts observed after an early stop only prove that a difference
    /// exists; they are not exact.
    #[must_use]
    pub fn with_stop_on_diff(mut self, enabled: bool) -> Self {
        self.stop_on_diff = enabled;
        self
    }

    /// Enables or disables the URI fragment path dialect.
    #[must_use]
    pub fn with_uri_fragment_id(mut self, enabled: bool) -> Self {
        self.uri_fragment_id = enabled;
        self
    }

    /// Enables or disables skipping JSON Patch generation.
    #[must_use]
    pub fn with_skip_json_patch(mut self, enabled: bool) -> Self {
        self.skip_json_patch = enabled;
        self
    }

    /// Enables or disables skipping JSON Merge Patch generation.
    #[must_use]
    pub fn with_skip_json_merge_patch(mut self, enabled: bool) -> Self {
        self.skip_json_merge_patch = enabled;
        self
    }

    fn enabled_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.rearrange_arrays {
            names.push(Self::REARRANGE_ARRAYS);
        }
        if self.stop_on_diff {
            names.push(Self::STOP_ON_DIFF);
        }
        if self.uri_fragment_id {
            names.push(Self::JSON_URI_FRAGMENT_ID);
        }
        if self.skip_json_patch {
            names.push(Self::SKIP_JSON_PATCH);
        }
        if self.skip_json_merge_patch {
            names.push(Self::SKIP_JSON_MERGE_PATCH);
        }
        names
    }
}

impl fmt::Display for DiffOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.enabled_names().join("|"))
    }
}
