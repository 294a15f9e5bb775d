use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Trait for file access - real filesystem or an in-memory double.
///
/// The updater only needs three operations, so commands can run the full
/// pipeline against synthetic content without touching disk.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Other(format!("File not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        // Atomic write: write to temp file, then rename
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("Invalid path: {}", path.display())))?;

        let filename = path
            .file_name()
            .ok_or_else(|| Error::Other(format!("Invalid path: {}", path.display())))?;

        let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }
}

/// Convenience function to get local filesystem
pub fn local() -> LocalFs {
    LocalFs::new()
}

/// In-memory filesystem for tests and callers embedding the library.
///
/// Records every write so callers can assert that unchanged files are
/// never written back, and can be told to fail reads or writes of
/// specific paths to exercise I/O error handling.
#[derive(Default)]
pub struct MemoryFs {
    entries: std::cell::RefCell<std::collections::BTreeMap<PathBuf, String>>,
    writes: std::cell::RefCell<Vec<PathBuf>>,
    fail_reads: std::cell::RefCell<std::collections::BTreeSet<PathBuf>>,
    fail_writes: std::cell::RefCell<std::collections::BTreeSet<PathBuf>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file into the in-memory tree.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.entries
            .borrow_mut()
            .insert(path.into(), content.into());
    }

    /// Current content of a path, if present.
    pub fn content(&self, path: &Path) -> Option<String> {
        self.entries.borrow().get(path).cloned()
    }

    /// Paths written back, in write order.
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.borrow().clone()
    }

    /// Make subsequent reads of a path fail. The path still exists.
    pub fn fail_reads_on(&self, path: impl Into<PathBuf>) {
        self.fail_reads.borrow_mut().insert(path.into());
    }

    /// Make subsequent writes of a path fail.
    pub fn fail_writes_on(&self, path: impl Into<PathBuf>) {
        self.fail_writes.borrow_mut().insert(path.into());
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.entries.borrow().contains_key(path)
    }

    fn read(&self, path: &Path) -> Result<String> {
        if self.fail_reads.borrow().contains(path) {
            return Err(Error::Other(format!(
                "Permission denied: {}",
                path.display()
            )));
        }
        self.entries
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Other(format!("File not found: {}", path.display())))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if self.fail_writes.borrow().contains(path) {
            return Err(Error::Other(format!(
                "Permission denied: {}",
                path.display()
            )));
        }
        self.entries
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        self.writes.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}
