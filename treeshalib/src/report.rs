//! Reporting: drives one traversal per root and formats the results.
//!
//! Text output is line oriented. For each root the diagnostics appear first,
//! in traversal order, followed by one summary line:
//!
//! ```text
//!     <HEX> <file name>                     per-file mode only
//! <directory> <source file count>          incomplete directories
//! <HEX> (<count>)(<yy/MM/dd HH:mm>) : <label>[*]
//! ```
//!
//! A root that cannot be listed prints `<path> not found` instead.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::digest::{Digest, HashAccumulator};
use crate::error::TreeshaError;
use crate::options::{HashOptions, OutputFormat, RootSpec};
use crate::stats::DirectoryStatistics;
use crate::traverse::{Diagnostic, DiagnosticSink, Traverser};
use crate::Result;

/// `yyyy/MM/dd HH:mm:ss`, sliced to `yy/MM/dd HH:mm` on the summary line.
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Result of processing one root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RootOutcome {
    /// Traversal completed
    Hashed {
        digest: Digest,
        stats: DirectoryStatistics,
    },
    /// Root path could not be listed
    NotFound,
    /// Traversal was abandoned part way
    Failed { error: String },
}

/// Everything produced for one root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootReport {
    pub label: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: RootOutcome,
    /// Diagnostics in traversal order (JSON runs only)
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcomes of a whole run, in root order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub roots: Vec<RootReport>,
}

impl RunSummary {
    /// Roots whose traversal was abandoned.
    pub fn failures(&self) -> impl Iterator<Item = &RootReport> {
        self.roots
            .iter()
            .filter(|r| matches!(r.outcome, RootOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Fingerprint a single root with a fresh accumulator.
///
/// Root-scoped failures (unreadable directory or file) become
/// [`RootOutcome::Failed`]; sink errors are returned since they mean the
/// output itself is broken.
pub fn hash_root<S>(root: &RootSpec, options: &HashOptions, sink: &mut S) -> Result<RootOutcome>
where
    S: DiagnosticSink + ?Sized,
{
    if fs::read_dir(&root.path).is_err() {
        warn!(path = %root.path.display(), "root not found");
        return Ok(RootOutcome::NotFound);
    }

    let mut accumulator = HashAccumulator::new();
    let traverser = Traverser::new(&options.filters, &options.policy).per_file(options.per_file);

    match traverser.traverse(&root.path, &mut accumulator, sink) {
        Ok(stats) => {
            let digest = accumulator.finalize();
            info!(
                label = %root.label,
                count = stats.count,
                digest = %digest,
                "root hashed"
            );
            Ok(RootOutcome::Hashed { digest, stats })
        }
        Err(e) if e.is_root_scoped() => {
            error!(label = %root.label, error = %e, "abandoning root");
            Ok(RootOutcome::Failed {
                error: e.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

/// Process every root, writing in the requested format.
///
/// Only output failures are returned as errors; per-root failures are
/// recorded in the summary and the remaining roots are still processed.
pub fn run<W: Write + ?Sized>(
    options: &HashOptions,
    format: OutputFormat,
    out: &mut W,
) -> Result<RunSummary> {
    match format {
        OutputFormat::Text => run_text(options, out),
        OutputFormat::Json => run_json(options, out),
    }
}

/// Line-oriented output; diagnostics are written as they are produced.
///
/// Diagnostics are not kept in the returned summary.
pub fn run_text<W: Write + ?Sized>(options: &HashOptions, out: &mut W) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for root in &options.roots {
        let outcome = hash_root(root, options, &mut LineSink { out: &mut *out })?;

        match &outcome {
            RootOutcome::Hashed { digest, stats } => {
                writeln!(out, "{}", format_summary(digest, stats, &root.label))?;
            }
            RootOutcome::NotFound => writeln!(out, "{}", format_not_found(&root.path))?,
            RootOutcome::Failed { .. } => {}
        }

        summary.roots.push(RootReport {
            label: root.label.clone(),
            path: root.path.clone(),
            outcome,
            diagnostics: Vec::new(),
        });
    }

    Ok(summary)
}

/// A single pretty-printed JSON document covering every root.
pub fn run_json<W: Write + ?Sized>(options: &HashOptions, out: &mut W) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for root in &options.roots {
        let mut diagnostics = Vec::new();
        let outcome = hash_root(root, options, &mut diagnostics)?;
        summary.roots.push(RootReport {
            label: root.label.clone(),
            path: root.path.clone(),
            outcome,
            diagnostics,
        });
    }

    serde_json::to_writer_pretty(&mut *out, &summary)?;
    writeln!(out)?;
    Ok(summary)
}

/// Writes each diagnostic as a line as soon as it is produced.
struct LineSink<'w, W: Write + ?Sized> {
    out: &'w mut W,
}

impl<W: Write + ?Sized> DiagnosticSink for LineSink<'_, W> {
    fn emit(&mut self, diagnostic: Diagnostic) -> Result<()> {
        writeln!(self.out, "{}", format_diagnostic(&diagnostic))?;
        Ok(())
    }
}

/// Format a diagnostic as one output line (without newline).
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    match diagnostic {
        Diagnostic::FileDigest { path, digest } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            format!("\t{} {}", digest, name)
        }
        Diagnostic::IncompleteDirectory { path, source_files } => {
            format!("{} {}", path.display(), source_files)
        }
    }
}

/// Summary line using local time.
pub fn format_summary(digest: &Digest, stats: &DirectoryStatistics, label: &str) -> String {
    format_summary_in(digest, stats, label, &Local)
}

/// Summary line with the timestamp rendered in `tz`.
pub fn format_summary_in<Tz>(
    digest: &Digest,
    stats: &DirectoryStatistics,
    label: &str,
    tz: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{} ({:>3})({}) : {}{}",
        digest,
        stats.count,
        format_timestamp_in(stats.last_modified, tz),
        label,
        if stats.doc_complete { "" } else { "*" }
    )
}

/// Line printed for a root that cannot be listed.
pub fn format_not_found(path: &Path) -> String {
    format!("{} not found", path.display())
}

/// Render epoch milliseconds as the 14-character `yy/MM/dd HH:mm` slice.
pub fn format_timestamp_in<Tz>(millis: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let utc = i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_default();
    let full = utc.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string();
    full.get(2..16).unwrap_or(&full).to_string()
}

/// Where run output goes: standard output or a truncated file.
///
/// Opened once per run; [`Destination::finish`] flushes and closes it.
#[derive(Debug)]
pub enum Destination {
    Stdout(io::Stdout),
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
}

impl Destination {
    /// Open the destination, creating or truncating `path` if given.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Destination::Stdout(io::stdout())),
            Some(path) => {
                let file = File::create(path).map_err(|source| TreeshaError::OutputOpen {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(Destination::File {
                    path: path.to_path_buf(),
                    writer: BufWriter::new(file),
                })
            }
        }
    }

    /// Flush and close. Returns the file path when writing to a file.
    pub fn finish(mut self) -> Result<Option<PathBuf>> {
        self.flush()?;
        match self {
            Destination::Stdout(_) => Ok(None),
            Destination::File { path, .. } => Ok(Some(path)),
        }
    }
}

impl Write for Destination {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Destination::Stdout(out) => out.write(buf),
            Destination::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Destination::Stdout(out) => out.flush(),
            Destination::File { writer, .. } => writer.flush(),
        }
    }
}
