//! One-shot directory sorting.
//!
//! The batch scanner enumerates the direct-child regular files of a
//! directory once and relocates each into its destination folder. Files
//! are assumed to already be at rest on disk, so no settle delay is
//! applied. Each file is handled independently: a failure is logged and
//! counted, never aborting the rest of the scan.

use crate::config::SortPlan;
use crate::file_mover::{FileMover, MoveResult};
use crate::output::OutputFormatter;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can abort a batch scan before any file is visited.
#[derive(Debug)]
pub enum ScanError {
    /// The base directory could not be enumerated.
    BaseDirUnreadable { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BaseDirUnreadable { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// Result type for batch scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Counters accumulated over one batch scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files successfully relocated.
    pub moved: usize,
    /// Files whose move failed (left at their original path).
    pub failed: usize,
    /// Successful moves per destination folder name.
    pub folder_counts: HashMap<String, usize>,
}

/// Classifies one file and moves it into its folder under `base_dir`.
///
/// This is the shared classify-then-move step: watch mode and one-shot
/// mode both funnel every file through it, so destination resolution and
/// collision handling behave identically in the two modes.
pub fn sort_into_place(base_dir: &Path, plan: &SortPlan, file_path: &Path) -> MoveResult<PathBuf> {
    let folder = plan.rules.folder_for_path(file_path);
    let dest_dir = base_dir.join(folder);
    FileMover::move_into(file_path, &dest_dir)
}

/// Sorts every direct-child regular file of `base_dir` into place.
///
/// Subdirectories are neither entered nor moved; entries are visited in
/// the order the filesystem yields them. The entry list is snapshotted
/// before the first move so destination folders created during the scan
/// are not re-visited. Ignored files (per the plan's ignore rules) are
/// left where they are.
///
/// Per-file outcomes are logged as they happen. The returned summary
/// reports how many files were moved, how many failed, and the per-folder
/// distribution of the successes.
///
/// # Errors
///
/// Fails only if `base_dir` itself cannot be enumerated.
pub fn organize_once(base_dir: &Path, plan: &SortPlan) -> ScanResult<ScanSummary> {
    let entries = fs::read_dir(base_dir).map_err(|e| ScanError::BaseDirUnreadable {
        path: base_dir.to_path_buf(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries.flatten() {
        if let Ok(file_type) = entry.file_type()
            && file_type.is_file()
        {
            let path = entry.path();
            if plan.ignore.should_sort(&path) {
                files.push(path);
            }
        }
    }

    let mut summary = ScanSummary::default();
    let progress = OutputFormatter::create_progress_bar(files.len() as u64);

    for file_path in &files {
        let folder = plan.rules.folder_for_path(file_path).to_string();
        match sort_into_place(base_dir, plan, file_path) {
            Ok(final_path) => {
                OutputFormatter::progress_success(
                    &progress,
                    &format!("Moved {} -> {}", file_path.display(), final_path.display()),
                );
                summary.moved += 1;
                *summary.folder_counts.entry(folder).or_insert(0) += 1;
            }
            Err(e) => {
                OutputFormatter::progress_error(
                    &progress,
                    &format!("Failed to move {}: {}", file_path.display(), e),
                );
                summary.failed += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(summary)
}
