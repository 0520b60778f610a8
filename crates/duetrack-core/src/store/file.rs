//! JSON file slot.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::store::slot::SlotStorage;

/// One file per storage key, e.g. `<dir>/assignmentTracker.json`.
///
/// Writes land in a sibling temp file that is then renamed over the slot, so
/// a crash mid-write leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SlotStorage for FileSlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(format!("{}: {}", self.path.display(), e))),
        }
    }

    fn write(&self, value: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::Write(format!("{}: {}", parent.display(), e)))?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, value)
            .map_err(|e| StorageError::Write(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StorageError::Write(format!("{}: {}", self.path.display(), e)))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write(format!("{}: {}", self.path.display(), e))),
        }
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
