//! FileSystem port - abstraction over file I/O operations
//!
//! The side-effect executor and the default adapters go through this trait
//! so they can run against an in-memory implementation in tests.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug)]
pub enum FsError {
    NotFound(PathBuf),
    PermissionDenied(PathBuf),
    /// Path is malformed, or a component has the wrong type
    InvalidPath(PathBuf),
    /// Out of space
    Disk(PathBuf),
    Io(PathBuf, std::io::Error),
    Other(String),
}

impl FsError {
    /// Classify an I/O error that happened on `path`
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            ErrorKind::NotFound => FsError::NotFound(path),
            ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => {
                FsError::PermissionDenied(path)
            }
            ErrorKind::InvalidInput
            | ErrorKind::NotADirectory
            | ErrorKind::IsADirectory
            | ErrorKind::AlreadyExists => FsError::InvalidPath(path),
            ErrorKind::StorageFull => FsError::Disk(path),
            _ => FsError::Io(path, err),
        }
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FsError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            FsError::InvalidPath(path) => write!(f, "Invalid path: {}", path.display()),
            FsError::Disk(path) => write!(f, "No space left writing {}", path.display()),
            FsError::Io(path, err) => write!(f, "I/O error on {}: {}", path.display(), err),
            FsError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FsError::Io(_, err) => Some(err),
            _ => None,
        }
    }
}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O with atomic writes
/// - `MemoryFs` (tests) - in-memory tree
pub trait FileSystem: Send + Sync {
    fn read(&self, path: &Path) -> FsResult<Vec<u8>>;

    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes)
            .map_err(|_| FsError::Other(format!("{} is not valid UTF-8", path.display())))
    }

    /// Write content atomically, creating parent directories
    fn write(&self, path: &Path, content: &[u8]) -> FsResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Create directory and parents
    fn create_dir_all(&self, path: &Path) -> FsResult<()>;

    /// Remove a file, or a directory recursively
    fn remove(&self, path: &Path) -> FsResult<()>;

    /// Direct children of a directory, sorted
    fn list_dir(&self, path: &Path) -> FsResult<Vec<PathBuf>>;
}
