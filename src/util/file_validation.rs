//! File validation and reading for display
//!
//! Validates a source before reading it, checking for:
//! - File existence and permissions
//! - Directories passed where a file is expected
//! - File size limits
//!
//! Every failure maps to a [`FileOpenError`] whose `user_message` is what the
//! panel shows in place of the file contents.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Maximum file size in bytes (50 MB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Errors that can occur when opening a source file for display
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FileOpenError {
    #[error("file not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("is a directory")]
    IsDirectory,
    #[error("file too large ({size_mb:.1} MB)")]
    TooLarge { size_mb: f64 },
    #[error("{0}")]
    Io(String),
}

impl FileOpenError {
    /// Get a user-friendly error message
    pub fn user_message(&self, path: &str) -> String {
        match self {
            Self::NotFound => format!("File not found: {}", path),
            Self::PermissionDenied => format!("Permission denied: {}", path),
            Self::IsDirectory => format!("Cannot display directory: {}", path),
            Self::TooLarge { size_mb } => format!(
                "{} is too large ({:.1} MB, max {} MB)",
                path,
                size_mb,
                MAX_FILE_SIZE / (1024 * 1024)
            ),
            Self::Io(msg) => format!("Error reading {}: {}", path, msg),
        }
    }
}

impl From<io::Error> for FileOpenError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::IsADirectory => Self::IsDirectory,
            _ => Self::Io(e.to_string()),
        }
    }
}

/// Validate a file before attempting to read it
///
/// Checks that the file exists, is not a directory and does not exceed the
/// size limit. Read permission is only known once the read is attempted.
pub fn validate_file_for_reading(path: &Path) -> Result<(), FileOpenError> {
    let metadata = fs::metadata(path)?;

    if metadata.is_dir() {
        return Err(FileOpenError::IsDirectory);
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(FileOpenError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(())
}

/// Validate and read a file's raw bytes
pub fn read_source(path: &Path) -> Result<Vec<u8>, FileOpenError> {
    validate_file_for_reading(path)?;
    Ok(fs::read(path)?)
}

/// Check if content is likely binary by scanning for null bytes
///
/// Only the first 8KB are inspected.
pub fn is_likely_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(8192).any(|&b| b == 0)
}
