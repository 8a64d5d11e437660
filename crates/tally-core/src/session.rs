//! Logged-on user session
//!
//! A [`Session`] owns everything that belongs to the current user: the
//! profile, the raw record it came from, and the recent-files list. It is
//! created by [`Session::log_on`] and consumed by [`Session::log_off`], and
//! is passed explicitly to whatever needs it.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::models::Profile;
use crate::record::{enumerate_strings, join_strings};
use crate::storage::{ensure_dir, RecordFile, StorageResult};

/// Record file inside each user folder
pub const RECORD_FILE: &str = "config.txt";

/// Recent-files list inside each user folder
pub const RECENT_FILE: &str = "recent.txt";

/// Per-grade data folder inside each user folder
pub const GRADES_DIR: &str = "Grades";

/// State of a logged-on user
#[derive(Debug)]
pub struct Session {
    user_dir: PathBuf,
    record: RecordFile,
    recent_file: RecordFile,
    /// Record text as last loaded or saved
    document: String,
    profile: Profile,
    recent: Vec<String>,
}

impl Session {
    /// Log on the user stored in `user_dir`
    ///
    /// Creates the folder and its grades folder if needed. A missing record
    /// or recent list starts out empty.
    pub fn log_on(user_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let user_dir = user_dir.into();
        ensure_dir(&user_dir)?;
        ensure_dir(&user_dir.join(GRADES_DIR))?;

        let record = RecordFile::new(user_dir.join(RECORD_FILE));
        let recent_file = RecordFile::new(user_dir.join(RECENT_FILE));

        let document = record.load()?;
        let profile = Profile::from_record(&document);
        let recent = enumerate_strings(&recent_file.load()?);

        info!("Logged on {:?} from {:?}", profile.user_name, user_dir);

        Ok(Self {
            user_dir,
            record,
            recent_file,
            document,
            profile,
            recent,
        })
    }

    pub fn user_dir(&self) -> &Path {
        &self.user_dir
    }

    pub fn grades_dir(&self) -> PathBuf {
        self.user_dir.join(GRADES_DIR)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    pub fn is_teacher(&self) -> bool {
        self.profile.is_teacher
    }

    /// Students managed by this user; always empty for non-teachers
    pub fn students(&self) -> &[String] {
        if self.profile.is_teacher {
            &self.profile.students
        } else {
            &[]
        }
    }

    /// Recent files, most recent first
    pub fn recent(&self) -> &[String] {
        &self.recent
    }

    /// Recent files limited to the profile's display count (0 means all)
    pub fn visible_recent(&self) -> &[String] {
        match usize::try_from(self.profile.max_recent_files) {
            Ok(max) if max > 0 && max < self.recent.len() => &self.recent[..max],
            _ => &self.recent,
        }
    }

    /// Move `file` to the front of the recent list
    ///
    /// Files that do not exist are ignored. Returns whether the list changed.
    pub fn touch_recent(&mut self, file: &Path) -> bool {
        if !file.is_file() {
            debug!("Not adding missing file {:?} to recent list", file);
            return false;
        }
        let entry = file.to_string_lossy().into_owned();
        self.recent.retain(|item| *item != entry);
        self.recent.insert(0, entry);
        true
    }

    /// Remove `file` from the recent list
    pub fn forget_recent(&mut self, file: &str) -> bool {
        let before = self.recent.len();
        self.recent.retain(|item| item != file);
        self.recent.len() != before
    }

    /// Check whether this user may view records stored in `other_dir`
    ///
    /// True for the user's own folder and for the folders of their students.
    pub fn can_view(&self, other_dir: &Path) -> bool {
        let Some(other) = other_dir.file_name() else {
            return false;
        };
        if self.user_dir.file_name() == Some(other) {
            return true;
        }
        let other = other.to_string_lossy();
        self.students().iter().any(|student| *student == other)
    }

    /// Write the profile and recent list back to disk
    ///
    /// The profile is merged into the record it was loaded from, so fields
    /// this program does not know about are kept.
    pub fn save(&mut self) -> StorageResult<()> {
        let updated = self.profile.merge_into(&self.document);
        self.record.save(&updated)?;
        self.document = updated;
        self.recent_file.save(&join_strings(&self.recent))?;
        debug!("Saved session for {:?}", self.profile.user_name);
        Ok(())
    }

    /// Save and end the session
    pub fn log_off(mut self) -> StorageResult<()> {
        self.save()?;
        info!("Logged off {:?}", self.profile.user_name);
        Ok(())
    }
}
