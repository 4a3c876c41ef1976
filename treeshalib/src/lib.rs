//! # treeshalib
//!
//! Deterministic SHA-1 fingerprints of source trees.
//!
//! ## Overview
//!
//! A fingerprint summarizes every included file below a root directory, so a
//! build can tell whether a project's source changed since the last run. One
//! pass over each root computes:
//!
//! - **Digest**: SHA-1 over the contents of every included file, in a fixed
//!   order (files before subdirectories, each sorted by name)
//! - **Count**: number of included files
//! - **Last modified**: newest modification time among included files
//! - **Completeness**: whether every source package carries its
//!   documentation marker file (`package-info.java` by default)
//!
//! Folders can be excluded by exact name and files by name suffix.
//!
//! ## Example
//!
//! ```rust
//! use treeshalib::{run, ExclusionFilters, HashOptions, OutputFormat, RootSpec};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let pkg = dir.path().join("proj/src/pkg");
//! fs::create_dir_all(&pkg).unwrap();
//! fs::write(pkg.join("A.java"), "a").unwrap();
//! fs::write(pkg.join("B.java"), "b").unwrap();
//! fs::write(pkg.join("A.class"), "compiled").unwrap();
//!
//! let options = HashOptions::new()
//!     .root(RootSpec::new(&pkg, "pkg"))
//!     .filters(ExclusionFilters::new().exclude_extensions(".class"));
//!
//! let mut out = Vec::new();
//! let summary = run(&options, OutputFormat::Text, &mut out).unwrap();
//! let text = String::from_utf8(out).unwrap();
//!
//! // No package-info.java next to A.java and B.java: the line is starred.
//! assert!(text.lines().last().unwrap().ends_with(" : pkg*"));
//! assert!(!summary.has_failures());
//! ```

pub mod config;
pub mod digest;
pub mod error;
pub mod filter;
pub mod options;
pub mod report;
pub mod stats;
pub mod traverse;

pub use config::Config;
pub use digest::{Digest, HashAccumulator};
pub use error::TreeshaError;
pub use filter::{CompletenessPolicy, ExclusionFilters};
pub use options::{HashOptions, OutputFormat, RootSpec};
pub use report::{
    format_diagnostic, format_summary, hash_root, run, run_json, run_text, Destination,
    RootOutcome, RootReport, RunSummary,
};
pub use stats::DirectoryStatistics;
pub use traverse::{Diagnostic, DiagnosticSink, Traverser};

/// Result type for treeshalib operations
pub type Result<T> = std::result::Result<T, TreeshaError>;
