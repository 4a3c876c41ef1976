//! Recursive traversal: the core of the fingerprint.
//!
//! A directory is processed in two phases. Its files are visited first, in
//! file name order, feeding included bytes to the shared accumulator. Its
//! subdirectories follow, also in file name order, each folded into the
//! parent's statistics. The fixed order makes the digest reproducible across
//! filesystems that list entries differently.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::digest::{Digest, HashAccumulator};
use crate::error::TreeshaError;
use crate::filter::{CompletenessPolicy, ExclusionFilters};
use crate::stats::{epoch_millis, DirectoryStatistics};
use crate::Result;

/// Informational output produced while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Digest of a single included file (per-file mode only)
    FileDigest { path: PathBuf, digest: Digest },
    /// Subtree whose documentation marker requirement is not met
    IncompleteDirectory { path: PathBuf, source_files: usize },
}

/// Receiver for diagnostics, in traversal order.
pub trait DiagnosticSink {
    /// Accept one diagnostic. An error aborts the traversal.
    fn emit(&mut self, diagnostic: Diagnostic) -> Result<()>;
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) -> Result<()> {
        self.push(diagnostic);
        Ok(())
    }
}

/// Walks one root, applying filters and the completeness policy.
#[derive(Debug, Clone, Copy)]
pub struct Traverser<'a> {
    filters: &'a ExclusionFilters,
    policy: &'a CompletenessPolicy,
    per_file: bool,
}

impl<'a> Traverser<'a> {
    pub fn new(filters: &'a ExclusionFilters, policy: &'a CompletenessPolicy) -> Self {
        Self {
            filters,
            policy,
            per_file: false,
        }
    }

    /// Emit a `FileDigest` diagnostic for each included file.
    pub fn per_file(mut self, enabled: bool) -> Self {
        self.per_file = enabled;
        self
    }

    /// Process the subtree rooted at `dir`.
    ///
    /// Fails with `DirectoryUnreadable` if any directory in the subtree cannot
    /// be listed and `FileRead` if any included file cannot be read. The
    /// accumulator is left partially fed on failure and must be discarded.
    pub fn traverse<S>(
        &self,
        dir: &Path,
        accumulator: &mut HashAccumulator,
        sink: &mut S,
    ) -> Result<DirectoryStatistics>
    where
        S: DiagnosticSink + ?Sized,
    {
        let mut ancestors = Vec::new();
        self.visit(dir, accumulator, sink, &mut ancestors)
    }

    fn visit<S>(
        &self,
        dir: &Path,
        accumulator: &mut HashAccumulator,
        sink: &mut S,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<DirectoryStatistics>
    where
        S: DiagnosticSink + ?Sized,
    {
        debug!(dir = %dir.display(), "entering directory");

        let canonical = fs::canonicalize(dir).map_err(|source| unreadable(dir, source))?;
        if ancestors.contains(&canonical) {
            return Err(unreadable(
                dir,
                io::Error::other("directory links back to one of its ancestors"),
            ));
        }

        let (files, dirs) = list_directory(dir)?;

        let source_files = files
            .iter()
            .filter(|e| self.policy.is_source_file(&entry_name(e)))
            .count();

        let mut stats = DirectoryStatistics::new(self.policy.exempts(dir, source_files));

        for entry in &files {
            let name = entry_name(entry);

            if self.policy.is_marker(&name) && source_files >= 1 {
                stats.doc_complete = true;
            }

            if self.filters.is_excluded_extension(&name) {
                debug!(file = %entry.path().display(), "skipping excluded file");
                continue;
            }

            let (bytes, modified) = read_file(entry.path())?;
            accumulator.append(&bytes);
            stats.add_file(modified);

            if self.per_file {
                sink.emit(Diagnostic::FileDigest {
                    path: entry.path().to_path_buf(),
                    digest: Digest::of(&bytes),
                })?;
            }
        }

        ancestors.push(canonical);
        for entry in &dirs {
            if self.filters.is_excluded_folder(&entry_name(entry)) {
                debug!(dir = %entry.path().display(), "skipping excluded folder");
                continue;
            }

            let child = self.visit(entry.path(), accumulator, sink, ancestors)?;
            stats.merge(&child);
        }
        ancestors.pop();

        if !stats.doc_complete {
            sink.emit(Diagnostic::IncompleteDirectory {
                path: dir.to_path_buf(),
                source_files,
            })?;
        }

        Ok(stats)
    }
}

/// List a directory's entries, split into files and subdirectories.
///
/// Both sequences are sorted by file name. Symbolic links are followed, so a
/// link to a directory is listed as a directory.
fn list_directory(dir: &Path) -> Result<(Vec<DirEntry>, Vec<DirEntry>)> {
    if !dir.is_dir() {
        return Err(unreadable(dir, io::Error::other("not a directory")));
    }

    let mut files = Vec::new();
    let mut dirs = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| unreadable(dir, e.into()))?;
        if entry.file_type().is_dir() {
            dirs.push(entry);
        } else {
            files.push(entry);
        }
    }

    Ok((files, dirs))
}

/// Read a file's full content and its modification time in epoch millis.
///
/// The handle is closed before returning, on success or failure.
fn read_file(path: &Path) -> Result<(Vec<u8>, u64)> {
    let to_err = |source| TreeshaError::FileRead {
        path: path.to_path_buf(),
        source,
    };
    let bytes = fs::read(path).map_err(to_err)?;
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(to_err)?;
    Ok((bytes, epoch_millis(modified)))
}

fn entry_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

fn unreadable(dir: &Path, source: io::Error) -> TreeshaError {
    TreeshaError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    }
}
