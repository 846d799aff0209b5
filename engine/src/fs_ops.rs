//! Filesystem operations module.
//!
//! This module provides low-level operations for:
//! - Checking that a configured source is a readable regular file
//! - Copying files with permission and timestamp preservation
//! - Creating the destination directory recursively

use std::fs;
use std::io;
use std::path::Path;
use filetime::FileTime;
use crate::error::EngineError;

/// Returns true if `path` exists and is a regular file (symlinks followed).
pub fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Returns true if both paths resolve to the same existing file.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy a file from source to destination with metadata preservation.
///
/// An existing file at `dst` is truncated and overwritten. Permissions and
/// access/modification times are copied from `src` after the contents;
/// failing to apply them does not fail the copy.
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// `ReadError` if the source cannot be opened or read, `WriteError` if the
/// destination cannot be created or written or is the source itself.
pub fn copy_file_with_metadata(src: &Path, dst: &Path) -> Result<u64, EngineError> {
    let mut src_file = fs::File::open(src).map_err(|e| EngineError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    let src_metadata = src_file.metadata().map_err(|e| EngineError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    // Creating the destination would truncate the source when they are the same file
    if is_same_file(src, dst) {
        return Err(EngineError::WriteError {
            path: dst.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "source and destination are the same file",
            ),
        });
    }

    let mut dst_file = fs::File::create(dst).map_err(|e| EngineError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let bytes_copied = io::copy(&mut src_file, &mut dst_file).map_err(|e| {
        if e.kind() == io::ErrorKind::PermissionDenied {
            EngineError::WriteError {
                path: dst.to_path_buf(),
                source: e,
            }
        } else {
            EngineError::ReadError {
                path: src.to_path_buf(),
                source: e,
            }
        }
    })?;
    drop(dst_file);

    if let Err(e) = fs::set_permissions(dst, src_metadata.permissions()) {
        tracing::debug!(path = %dst.display(), error = %e, "could not copy permissions");
    }

    let atime = FileTime::from_last_access_time(&src_metadata);
    let mtime = FileTime::from_last_modification_time(&src_metadata);
    if let Err(e) = filetime::set_file_times(dst, atime, mtime) {
        tracing::debug!(path = %dst.display(), error = %e, "could not copy timestamps");
    }

    Ok(bytes_copied)
}

/// Ensure `dir` exists as a directory, creating it and any parents if necessary.
///
/// # Errors
/// Returns `DirectoryCreationFailed` if creation fails or `dir` exists but is
/// not a directory.
pub fn ensure_dir_exists(dir: &Path) -> Result<(), EngineError> {
    match fs::metadata(dir) {
        Ok(metadata) => {
            if metadata.is_dir() {
                Ok(())
            } else {
                Err(EngineError::DirectoryCreationFailed {
                    path: dir.to_path_buf(),
                    source: io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "Path exists but is not a directory",
                    ),
                })
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| EngineError::DirectoryCreationFailed {
                path: dir.to_path_buf(),
                source: e,
            })
        }
        Err(e) => Err(EngineError::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source: e,
        }),
    }
}
