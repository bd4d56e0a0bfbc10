//! In-memory File System
//!
//! A `FileSystem` backed by an ordered map, for tests and dry runs. Paths
//! can be marked read-only to simulate permission failures.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    File(Vec<u8>),
    Dir,
}

#[derive(Debug, Default)]
pub struct MemoryFs {
    entries: Mutex<BTreeMap<PathBuf, Entry>>,
    read_only: BTreeSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutations at or below `path` fail with `PermissionDenied`
    pub fn with_read_only(mut self, path: impl Into<PathBuf>) -> Self {
        self.read_only.insert(path.into());
        self
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        {
            let mut entries = self.lock();
            Self::insert_parents(&mut entries, &path);
            entries.insert(path, Entry::File(content.into()));
        }
        self
    }

    /// Every file path, sorted
    pub fn files(&self) -> Vec<PathBuf> {
        self.lock()
            .iter()
            .filter(|(_, e)| matches!(e, Entry::File(_)))
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Every directory path, sorted
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.lock()
            .iter()
            .filter(|(_, e)| matches!(e, Entry::Dir))
            .map(|(p, _)| p.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self, path: &Path) -> FsResult<()> {
        if self.read_only.iter().any(|ro| path.starts_with(ro)) {
            return Err(FsError::PermissionDenied(path.to_path_buf()));
        }
        Ok(())
    }

    fn parents(path: &Path) -> impl Iterator<Item = &Path> {
        path.ancestors().skip(1).filter(|p| p.parent().is_some())
    }

    fn check_parents(entries: &BTreeMap<PathBuf, Entry>, path: &Path) -> FsResult<()> {
        for parent in Self::parents(path) {
            if let Some(Entry::File(_)) = entries.get(parent) {
                return Err(FsError::InvalidPath(path.to_path_buf()));
            }
        }
        Ok(())
    }

    fn insert_parents(entries: &mut BTreeMap<PathBuf, Entry>, path: &Path) {
        for parent in Self::parents(path) {
            entries.entry(parent.to_path_buf()).or_insert(Entry::Dir);
        }
    }
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &Path) -> FsResult<Vec<u8>> {
        match self.lock().get(path) {
            Some(Entry::File(content)) => Ok(content.clone()),
            Some(Entry::Dir) => Err(FsError::InvalidPath(path.to_path_buf())),
            None => Err(FsError::NotFound(path.to_path_buf())),
        }
    }

    fn write(&self, path: &Path, content: &[u8]) -> FsResult<()> {
        self.check_writable(path)?;
        let mut entries = self.lock();
        Self::check_parents(&entries, path)?;
        if let Some(Entry::Dir) = entries.get(path) {
            return Err(FsError::InvalidPath(path.to_path_buf()));
        }
        Self::insert_parents(&mut entries, path);
        entries.insert(path.to_path_buf(), Entry::File(content.to_vec()));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(Entry::Dir))
    }

    fn create_dir_all(&self, path: &Path) -> FsResult<()> {
        self.check_writable(path)?;
        let mut entries = self.lock();
        Self::check_parents(&entries, path)?;
        match entries.get(path) {
            Some(Entry::File(_)) => Err(FsError::InvalidPath(path.to_path_buf())),
            Some(Entry::Dir) => Ok(()),
            None => {
                Self::insert_parents(&mut entries, path);
                entries.insert(path.to_path_buf(), Entry::Dir);
                Ok(())
            }
        }
    }

    fn remove(&self, path: &Path) -> FsResult<()> {
        self.check_writable(path)?;
        let mut entries = self.lock();
        if !entries.contains_key(path) {
            return Err(FsError::NotFound(path.to_path_buf()));
        }
        entries.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> FsResult<Vec<PathBuf>> {
        let entries = self.lock();
        match entries.get(path) {
            Some(Entry::Dir) => Ok(entries
                .keys()
                .filter(|p| p.parent() == Some(path))
                .cloned()
                .collect()),
            Some(Entry::File(_)) => Err(FsError::InvalidPath(path.to_path_buf())),
            None => Err(FsError::NotFound(path.to_path_buf())),
        }
    }
}
