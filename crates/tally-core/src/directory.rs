//! User folders
//!
//! Every user lives in a sub-folder of the users directory with its own
//! `config.txt` record. This module scans those folders and applies
//! account-level changes to the records in place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::record::{get_value, replace_value_with, ReplaceOptions};
use crate::schema::format_bool;
use crate::session::RECORD_FILE;
use crate::storage::{RecordFile, StorageError, StorageResult};

/// Summary of one user folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEntry {
    pub folder: PathBuf,
    pub name: String,
    pub user_name: String,
}

/// The directory holding all user folders
#[derive(Debug, Clone)]
pub struct UserDirectory {
    root: PathBuf,
    options: ReplaceOptions,
}

impl UserDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: ReplaceOptions::default(),
        }
    }

    /// Use `options` when rewriting user records
    pub fn with_options(mut self, options: ReplaceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_files(&self) -> StorageResult<Vec<RecordFile>> {
        let read_dir = match fs::read_dir(&self.root) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Users directory {:?} does not exist yet", self.root);
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::reading(e, self.root.clone())),
        };

        let mut files = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| StorageError::reading(e, self.root.clone()))?;
            let record = entry.path().join(RECORD_FILE);
            if record.is_file() {
                files.push(RecordFile::new(record));
            }
        }
        files.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(files)
    }

    /// List every user folder that has a record, sorted by folder
    pub fn entries(&self) -> StorageResult<Vec<UserEntry>> {
        let mut entries = Vec::new();
        for file in self.record_files()? {
            let data = match file.load() {
                Ok(data) => data,
                Err(e) => {
                    warn!("Skipping unreadable user record: {}", e);
                    continue;
                }
            };
            let folder = file
                .path()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            entries.push(UserEntry {
                folder,
                name: get_value(&data, "Name"),
                user_name: get_value(&data, "UserName"),
            });
        }
        Ok(entries)
    }

    /// Find the record whose user name (any case) and password match
    ///
    /// Unreadable records are skipped.
    fn find_record(
        &self,
        user_name: &str,
        password: &str,
    ) -> StorageResult<Option<(RecordFile, String)>> {
        let wanted = user_name.to_uppercase();
        for file in self.record_files()? {
            let data = match file.load() {
                Ok(data) => data,
                Err(e) => {
                    warn!("Skipping unreadable user record: {}", e);
                    continue;
                }
            };
            if get_value(&data, "UserName").to_uppercase() == wanted
                && get_value(&data, "Password") == password
            {
                return Ok(Some((file, data)));
            }
        }
        Ok(None)
    }

    /// Find the folder of the user with these credentials
    pub fn authenticate(
        &self,
        user_name: &str,
        password: &str,
    ) -> StorageResult<Option<PathBuf>> {
        Ok(self
            .find_record(user_name, password)?
            .and_then(|(file, _)| file.path().parent().map(Path::to_path_buf)))
    }

    /// Grant or revoke the teacher flag for the user with these credentials
    ///
    /// Returns `false` when no user matches.
    pub fn set_teacher(
        &self,
        user_name: &str,
        password: &str,
        enabled: bool,
    ) -> StorageResult<bool> {
        let Some((file, data)) = self.find_record(user_name, password)? else {
            debug!("No user matches {:?}", user_name);
            return Ok(false);
        };

        let updated = replace_value_with(&data, "IsTeacher", &format_bool(enabled), &self.options);
        file.save(&updated)?;
        info!("Set IsTeacher={} for {:?}", enabled, user_name);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Boundary;
    use tempfile::TempDir;

    fn add_user(root: &Path, folder: &str, record: &str) {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(RECORD_FILE), record).unwrap();
    }

    #[test]
    fn test_entries_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let users = UserDirectory::new(temp_dir.path().join("Users"));
        assert!(users.entries().unwrap().is_empty());
    }

    #[test]
    fn test_entries() {
        let temp_dir = TempDir::new().unwrap();
        add_user(temp_dir.path(), "b", "Name = \"Ben\" UserName = \"ben\"");
        add_user(temp_dir.path(), "a", "Name = \"Ada\" UserName = \"ada\"");
        fs::create_dir_all(temp_dir.path().join("empty")).unwrap();

        let entries = UserDirectory::new(temp_dir.path()).entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Ada");
        assert_eq!(entries[0].user_name, "ada");
        assert!(entries[0].folder.ends_with("a"));
        assert_eq!(entries[1].name, "Ben");
    }

    #[test]
    fn test_authenticate() {
        let temp_dir = TempDir::new().unwrap();
        add_user(temp_dir.path(), "a", "UserName = \"Ada\" Password = \"secret\"");
        let users = UserDirectory::new(temp_dir.path());

        let folder = users.authenticate("ADA", "secret").unwrap().unwrap();
        assert!(folder.ends_with("a"));
        assert!(users.authenticate("ada", "SECRET").unwrap().is_none());
        assert!(users.authenticate("bob", "secret").unwrap().is_none());
    }

    #[test]
    fn test_unreadable_record_does_not_block_others() {
        let temp_dir = TempDir::new().unwrap();
        let bad = temp_dir.path().join("a");
        fs::create_dir_all(&bad).unwrap();
        fs::write(bad.join(RECORD_FILE), [0xff, 0xfe, 0x00]).unwrap();
        add_user(temp_dir.path(), "b", "UserName = \"ben\" Password = \"pw\"");
        let users = UserDirectory::new(temp_dir.path());

        assert_eq!(users.entries().unwrap().len(), 1);
        let folder = users.authenticate("ben", "pw").unwrap().unwrap();
        assert!(folder.ends_with("b"));
        assert!(users.set_teacher("ben", "pw", true).unwrap());
        assert!(users.authenticate("ada", "pw").unwrap().is_none());
    }

    #[test]
    fn test_set_teacher() {
        let temp_dir = TempDir::new().unwrap();
        add_user(
            temp_dir.path(),
            "a",
            "UserName = \"ada\" Password = \"pw\" IsTeacher = \"False\"",
        );
        let users = UserDirectory::new(temp_dir.path());

        assert!(users.set_teacher("Ada", "pw", true).unwrap());
        let data = fs::read_to_string(temp_dir.path().join("a").join(RECORD_FILE)).unwrap();
        assert_eq!(data, "UserName = \"ada\" Password = \"pw\" IsTeacher = \"True\"");

        assert!(!users.set_teacher("ada", "wrong", false).unwrap());
    }

    #[test]
    fn test_set_teacher_line_per_field() {
        let temp_dir = TempDir::new().unwrap();
        add_user(
            temp_dir.path(),
            "a",
            "UserName = \"ada\"\r\nPassword = \"pw\"\r\nIsTeacher = \"True\"\r\n",
        );
        let users = UserDirectory::new(temp_dir.path()).with_options(ReplaceOptions {
            boundary: Boundary::Lookup,
            ..ReplaceOptions::default()
        });

        assert!(users.set_teacher("ada", "pw", false).unwrap());
        let data = fs::read_to_string(temp_dir.path().join("a").join(RECORD_FILE)).unwrap();
        assert_eq!(data, "UserName = \"ada\"\r\nPassword = \"pw\"\r\nIsTeacher = \"False\"\r\n");
        assert_eq!(get_value(&data, "IsTeacher"), "False");
    }
}
