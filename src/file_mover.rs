/// Collision-safe file relocation.
///
/// This module moves files into destination directories, creating the
/// directory on demand and renaming on collision so no existing file is
/// ever overwritten. Collisions are resolved with a ` (N)` counter
/// inserted before the extension: `report.pdf`, `report (1).pdf`,
/// `report (2).pdf`, and so on.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while moving a file into a destination directory.
#[derive(Debug)]
pub enum MoveError {
    /// Failed to create the destination directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to check whether a candidate destination path is occupied.
    DestinationProbeFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// The move operation itself failed.
    FileMoveFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// The source path has no final file-name component.
    InvalidSourcePath { path: PathBuf },
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::DestinationProbeFailed { path, source } => {
                write!(
                    f,
                    "Failed to check destination {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::InvalidSourcePath { path } => {
                write!(f, "Invalid source path {}: no file name", path.display())
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Result type for file move operations.
pub type MoveResult<T> = Result<T, MoveError>;

/// Moves files into destination directories without overwriting.
pub struct FileMover;

impl FileMover {
    /// Moves `file_path` into `dest_dir`, returning the final destination path.
    ///
    /// The destination directory (and any missing ancestors) is created if
    /// absent. If a file with the same name already exists there, a counter
    /// suffix is appended before the extension until a free name is found.
    /// The counter search has no upper cap; it terminates because filesystem
    /// errors during the occupancy probe are surfaced as
    /// [`MoveError::DestinationProbeFailed`] instead of being retried.
    ///
    /// The check-then-rename sequence is not atomic: two processes sorting
    /// into the same tree at once can race the collision check. Source files
    /// are assumed to have a single producer.
    ///
    /// If the move fails after the directory was created, the (possibly
    /// empty) directory is left in place; a retry will reuse it.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortwatch::file_mover::FileMover;
    /// use std::path::Path;
    ///
    /// match FileMover::move_into(Path::new("/tmp/report.pdf"), Path::new("/tmp/Documents")) {
    ///     Ok(dest) => println!("Moved to {}", dest.display()),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn move_into(file_path: &Path, dest_dir: &Path) -> MoveResult<PathBuf> {
        fs::create_dir_all(dest_dir).map_err(|e| MoveError::DirectoryCreationFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let file_name = file_path
            .file_name()
            .ok_or_else(|| MoveError::InvalidSourcePath {
                path: file_path.to_path_buf(),
            })?;

        let destination = Self::free_destination(dest_dir, Path::new(file_name))?;

        match fs::rename(file_path, &destination) {
            Ok(()) => Ok(destination),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                Self::copy_and_remove(file_path, &destination)
            }
            Err(e) => Err(MoveError::FileMoveFailed {
                source: file_path.to_path_buf(),
                destination,
                source_error: e,
            }),
        }
    }

    /// Finds an unoccupied destination path for `file_name` inside `dest_dir`.
    fn free_destination(dest_dir: &Path, file_name: &Path) -> MoveResult<PathBuf> {
        let candidate = dest_dir.join(file_name);
        if !Self::occupied(&candidate)? {
            return Ok(candidate);
        }

        let stem = file_name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = file_name
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut counter: u64 = 1;
        loop {
            let candidate = dest_dir.join(format!("{} ({}){}", stem, counter, suffix));
            if !Self::occupied(&candidate)? {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    /// Checks whether anything already exists at `path`.
    fn occupied(path: &Path) -> MoveResult<bool> {
        path.try_exists()
            .map_err(|e| MoveError::DestinationProbeFailed {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Fallback for renames across filesystems: copy, then delete the source.
    ///
    /// `fs::copy` preserves content and permission bits. If the source cannot
    /// be deleted afterwards, the copy is removed again so the file is not
    /// duplicated.
    fn copy_and_remove(file_path: &Path, destination: &Path) -> MoveResult<PathBuf> {
        fs::copy(file_path, destination).map_err(|e| MoveError::FileMoveFailed {
            source: file_path.to_path_buf(),
            destination: destination.to_path_buf(),
            source_error: e,
        })?;

        if let Err(e) = fs::remove_file(file_path) {
            let _ = fs::remove_file(destination);
            return Err(MoveError::FileMoveFailed {
                source: file_path.to_path_buf(),
                destination: destination.to_path_buf(),
                source_error: e,
            });
        }

        Ok(destination.to_path_buf())
    }
}
