//! Record file storage
//!
//! A record lives in a small text file and is always read and written
//! whole. Writes go through a temp file and a rename so a crash never
//! leaves a half-written record behind.

pub mod error;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

pub use error::{StorageError, StorageResult};

/// A record file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFile {
    path: PathBuf,
}

impl RecordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists on disk
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the whole record
    ///
    /// A missing file reads as an empty record.
    pub fn load(&self) -> StorageResult<String> {
        match fs::read_to_string(&self.path) {
            Ok(data) => {
                debug!("Loaded {} bytes from {:?}", data.len(), self.path);
                Ok(data)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No record at {:?}, starting empty", self.path);
                Ok(String::new())
            }
            Err(e) => Err(StorageError::reading(e, self.path.clone())),
        }
    }

    /// Replace the whole record on disk
    pub fn save(&self, data: &str) -> StorageResult<()> {
        atomic_write(&self.path, data.as_bytes())?;
        debug!("Saved {} bytes to {:?}", data.len(), self.path);
        Ok(())
    }

    /// Load, transform and save the record in one step
    pub fn update<F>(&self, change: F) -> StorageResult<String>
    where
        F: FnOnce(&str) -> String,
    {
        let current = self.load()?;
        let updated = change(&current);
        if updated != current {
            self.save(&updated)?;
        }
        Ok(updated)
    }
}

/// Create a directory and its parents
pub fn ensure_dir(path: &Path) -> StorageResult<()> {
    fs::create_dir_all(path).map_err(|source| StorageError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");
    let write_temp = || -> io::Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()
    };
    write_temp().map_err(|e| StorageError::writing(e, temp_path.clone()))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        // Best effort; the rename error is the one reported
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::writing(e, path.to_path_buf()));
    }
    Ok(())
}
