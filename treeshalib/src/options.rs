//! Input options for a fingerprint run.
//!
//! This module contains the configuration types the invocation layer builds
//! and hands to [`crate::report::run`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::TreeshaError;
use crate::filter::{CompletenessPolicy, ExclusionFilters};

/// One configured root: a directory and the label printed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSpec {
    /// Directory to fingerprint
    pub path: PathBuf,
    /// Name shown on the summary line
    pub label: String,
}

impl RootSpec {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}

impl FromStr for RootSpec {
    type Err = TreeshaError;

    /// Parse `PATH` or `PATH=LABEL`. A bare path is its own label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, label) = match s.rsplit_once('=') {
            Some((path, label)) => (path, label),
            None => (s, s),
        };
        if path.is_empty() || label.is_empty() {
            return Err(TreeshaError::InvalidRoot(s.to_string()));
        }
        Ok(RootSpec::new(path, label))
    }
}

/// Output format of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One summary line per root, diagnostics interleaved
    #[default]
    Text,
    /// A single JSON document describing every root
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Options for fingerprinting a set of roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashOptions {
    /// Roots, processed in order
    pub roots: Vec<RootSpec>,
    /// Folder and extension exclusions shared by every root
    pub filters: ExclusionFilters,
    /// When a directory needs the documentation marker
    pub policy: CompletenessPolicy,
    /// Emit a digest line for every included file
    pub per_file: bool,
}

impl HashOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root.
    pub fn root(mut self, root: RootSpec) -> Self {
        self.roots.push(root);
        self
    }

    /// Add several roots.
    pub fn roots(mut self, roots: impl IntoIterator<Item = RootSpec>) -> Self {
        self.roots.extend(roots);
        self
    }

    /// Set exclusion filters.
    pub fn filters(mut self, filters: ExclusionFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Set the completeness policy.
    pub fn policy(mut self, policy: CompletenessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable per-file digest lines.
    pub fn per_file(mut self, enabled: bool) -> Self {
        self.per_file = enabled;
        self
    }
}
