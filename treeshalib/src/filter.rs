//! Exclusion filters and the package documentation policy.
//!
//! Folder exclusion is an exact name match, extension exclusion is a plain
//! suffix match on the file name. There are no wildcard semantics.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

/// Folder names and file name suffixes removed from consideration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionFilters {
    /// Exact folder names to skip entirely
    pub folders: Vec<String>,
    /// File name suffixes to skip
    pub extensions: Vec<String>,
}

impl ExclusionFilters {
    /// Create an empty filter set (nothing excluded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add space-delimited folder names.
    pub fn exclude_folders(mut self, names: &str) -> Self {
        self.folders.extend(split_list(names));
        self
    }

    /// Add space-delimited file name suffixes.
    pub fn exclude_extensions(mut self, suffixes: &str) -> Self {
        self.extensions.extend(split_list(suffixes));
        self
    }

    /// Check if a folder name is excluded.
    pub fn is_excluded_folder(&self, name: &str) -> bool {
        self.folders.iter().any(|f| f == name)
    }

    /// Check if a file name ends with an excluded suffix.
    pub fn is_excluded_extension(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }
}

// Empty items would match every file name as a suffix.
fn split_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split_whitespace().map(str::to_string)
}

/// Rules deciding when a directory must carry the documentation marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessPolicy {
    /// Per-directory documentation marker file name
    pub marker_file: String,
    /// Suffix identifying source files
    pub source_extension: String,
    /// Path component that source directories live under
    pub source_root: String,
    /// Substrings that exempt a path from the check
    pub test_markers: Vec<String>,
}

impl Default for CompletenessPolicy {
    fn default() -> Self {
        Self {
            marker_file: "package-info.java".to_string(),
            source_extension: ".java".to_string(),
            source_root: "src".to_string(),
            test_markers: vec!["test".to_string(), "junit".to_string()],
        }
    }
}

impl CompletenessPolicy {
    /// Check if a file name is the documentation marker.
    pub fn is_marker(&self, file_name: &str) -> bool {
        file_name == self.marker_file
    }

    /// Check if a file name is a source file other than the marker.
    pub fn is_source_file(&self, file_name: &str) -> bool {
        !self.is_marker(file_name) && file_name.ends_with(self.source_extension.as_str())
    }

    /// Check if a directory lies below a component named `source_root`.
    ///
    /// The final component is not considered, so the source root directory
    /// itself is not "under" it.
    pub fn is_under_source_root(&self, dir: &Path) -> bool {
        let components: Vec<Component<'_>> = dir.components().collect();
        let Some((_, ancestors)) = components.split_last() else {
            return false;
        };
        ancestors
            .iter()
            .any(|c| matches!(c, Component::Normal(name) if *name == self.source_root.as_str()))
    }

    /// Check if a path contains any test designation (case-sensitive).
    pub fn is_test_path(&self, dir: &Path) -> bool {
        let path_str = dir.to_string_lossy();
        self.test_markers
            .iter()
            .any(|marker| !marker.is_empty() && path_str.contains(marker.as_str()))
    }

    /// Baseline completeness before the directory's files are inspected.
    ///
    /// A directory needs no marker when it has no source files, is not under
    /// the source root, or is test-designated.
    pub fn exempts(&self, dir: &Path, source_files: usize) -> bool {
        source_files == 0 || !self.is_under_source_root(dir) || self.is_test_path(dir)
    }
}
