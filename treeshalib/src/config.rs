//! TOML configuration file.
//!
//! ```toml
//! exclude_folders = "bin .git"
//! exclude_extensions = [".class", ".log"]
//! output_file = "fingerprints.txt"
//! per_file = false
//!
//! [[root]]
//! path = "core/src"
//! label = "core"
//!
//! [completeness]
//! marker_file = "package-info.java"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::TreeshaError;
use crate::filter::{CompletenessPolicy, ExclusionFilters};
use crate::options::{HashOptions, RootSpec};
use crate::Result;

/// A space-delimited string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WordList {
    Line(String),
    List(Vec<String>),
}

impl Default for WordList {
    fn default() -> Self {
        WordList::Line(String::new())
    }
}

impl WordList {
    /// Flatten into one space-delimited string.
    pub fn joined(&self) -> String {
        match self {
            WordList::Line(line) => line.clone(),
            WordList::List(items) => items.join(" "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootEntry {
    pub path: PathBuf,
    pub label: Option<String>,
}

impl From<RootEntry> for RootSpec {
    fn from(entry: RootEntry) -> Self {
        let label = entry
            .label
            .unwrap_or_else(|| entry.path.to_string_lossy().into_owned());
        RootSpec::new(entry.path, label)
    }
}

/// Settings loaded from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub exclude_folders: WordList,
    pub exclude_extensions: WordList,
    pub output_file: Option<PathBuf>,
    pub per_file: bool,
    #[serde(rename = "root")]
    pub roots: Vec<RootEntry>,
    pub completeness: CompletenessPolicy,
}

impl Config {
    /// Load and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| TreeshaError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Parse configuration text; `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| TreeshaError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Build run options. Relative root paths are kept as written.
    pub fn into_options(self) -> HashOptions {
        let filters = ExclusionFilters::new()
            .exclude_folders(&self.exclude_folders.joined())
            .exclude_extensions(&self.exclude_extensions.joined());

        HashOptions::new()
            .roots(self.roots.into_iter().map(RootSpec::from))
            .filters(filters)
            .policy(self.completeness)
            .per_file(self.per_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("", Path::new("empty.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.into_options(), HashOptions::new());
    }

    #[test]
    fn test_full_config() {
        let text = r#"
exclude_folders = "bin .git"
exclude_extensions = [".class", ".log"]
output_file = "out.txt"
per_file = true

[[root]]
path = "core/src"
label = "core"

[[root]]
path = "web/src"

[completeness]
source_extension = ".kt"
test_markers = ["spec"]
"#;
        let config = Config::parse(text, Path::new("treesha.toml")).unwrap();
        assert_eq!(config.output_file, Some(PathBuf::from("out.txt")));

        let options = config.into_options();
        assert_eq!(
            options.roots,
            vec![
                RootSpec::new("core/src", "core"),
                RootSpec::new("web/src", "web/src"),
            ]
        );
        assert!(options.filters.is_excluded_folder(".git"));
        assert!(options.filters.is_excluded_extension("A.class"));
        assert!(options.filters.is_excluded_extension("build.log"));
        assert!(options.per_file);
        assert_eq!(options.policy.source_extension, ".kt");
        assert_eq!(options.policy.marker_file, "package-info.java");
        assert_eq!(options.policy.test_markers, vec!["spec"]);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = Config::parse("exclude_dirs = \"bin\"", Path::new("bad.toml"));

        assert!(matches!(result, Err(TreeshaError::Config { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempdir().unwrap();
        let result = Config::load(temp.path().join("missing.toml"));

        assert!(matches!(result, Err(TreeshaError::Config { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("treesha.toml");
        fs::write(&path, "per_file = true\n[[root]]\npath = \"a\"\nlabel = \"A\"\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert!(config.per_file);
        assert_eq!(config.roots.len(), 1);
    }
}
