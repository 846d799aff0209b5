//! Core data model for duplication runs.
//!
//! This module defines the structures a run is built from:
//! - SourceFile / DestinationSpec: the validated inputs
//! - PlanEntry / Plan: the immutable copy plan
//! - EntryOutcome / ExecutionReport: what happened when the plan was executed
//! - RunOptions: runtime flags

use std::path::{Path, PathBuf};

/// Lowercase file extension of `path` without the leading dot.
///
/// Returns an empty string when the file name has no extension
/// (including dotfiles such as `.hidden`).
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// A source file that was found under the run root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Name as configured, relative to the root
    pub name: String,

    /// Full path (root joined with name)
    pub path: PathBuf,

    /// Lowercase extension, empty if none
    pub extension: String,
}

impl SourceFile {
    pub fn new(root: &Path, name: &str) -> Self {
        let path = root.join(name);
        let extension = extension_of(&path);
        SourceFile {
            name: name.to_string(),
            path,
            extension,
        }
    }

    /// Final path component, for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// A configured destination (e.g. `images/aops-logo.svg`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationSpec {
    /// Relative path as configured
    pub relative: PathBuf,

    /// Lowercase extension, empty if none
    pub extension: String,
}

impl DestinationSpec {
    pub fn new(relative: &str) -> Self {
        let relative = PathBuf::from(relative);
        let extension = extension_of(&relative);
        DestinationSpec { relative, extension }
    }

    /// Basename the copy is written under inside the destination directory.
    pub fn basename(&self) -> &Path {
        self.relative
            .file_name()
            .map(Path::new)
            .unwrap_or(&self.relative)
    }
}

/// One (destination, chosen source) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub destination: DestinationSpec,

    /// Resolved destination path: destination directory joined with the basename
    pub destination_path: PathBuf,

    pub source: SourceFile,
}

/// The ordered copy plan for a run.
///
/// Built once by [`build_plan`](crate::job::build_plan); entries are never
/// modified afterwards. Execution results live in [`ExecutionReport`].
#[derive(Debug, Clone)]
pub struct Plan {
    /// Directory sources are resolved against and mapping paths are relative to
    pub root: PathBuf,

    /// Directory the copies are written into
    pub destination_dir: PathBuf,

    /// Where the mapping CSV is written
    pub mapping_path: PathBuf,

    /// Number of validated sources the plan was drawn from
    pub source_count: usize,

    pub entries: Vec<PlanEntry>,
}

impl Plan {
    /// `path` relative to the run root, falling back to `path` itself.
    pub fn relative_to_root<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Result of executing a single plan entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Copied successfully
    Copied { bytes: u64 },
    /// Copy failed; the run continued
    Failed { message: String },
}

impl EntryOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, EntryOutcome::Failed { .. })
    }
}

/// Outcome of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// One outcome per plan entry, in plan order
    pub outcomes: Vec<EntryOutcome>,

    pub mapping_path: PathBuf,
}

impl ExecutionReport {
    pub fn copied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

/// Runtime flags for a duplication run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Avoid repeating a fallback source until every source has been used once
    pub no_reuse: bool,
    /// Build and report the plan without touching the filesystem
    pub dry_run: bool,
    /// Report the plan and completion on the console
    pub verbose: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            no_reuse: false,
            dry_run: false,
            verbose: true,
        }
    }
}
