use std::path::PathBuf;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::StorageResult;
use super::json::JsonFile;
use super::model::{AnswerRecord, TeacherGuide};

pub const ANSWERS_FILE: &str = "answers.json";
pub const TEACHER_GUIDES_FILE: &str = "teacher_guides.json";

/// Append-only collection with sequential integer ids starting at 1.
#[derive(Debug)]
pub struct RecordLog<T> {
    file: JsonFile<T>,
    lock: Mutex<()>,
}

pub type AnswerLog = RecordLog<AnswerRecord>;
pub type TeacherGuideLog = RecordLog<TeacherGuide>;

impl<T> RecordLog<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
            lock: Mutex::new(()),
        }
    }

    /// Builds the next record from its id and appends it.
    pub fn append_with(&self, build: impl FnOnce(u64) -> T) -> StorageResult<T> {
        let _guard = self.lock.lock();
        let mut records = self.file.load_for_write()?;
        let record = build(records.len() as u64 + 1);
        records.push(record.clone());
        self.file.save(&records)?;
        Ok(record)
    }

    pub fn list(&self) -> StorageResult<Vec<T>> {
        let _guard = self.lock.lock();
        self.file.load()
    }
}

impl AnswerLog {
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir.into().join(ANSWERS_FILE))
    }
}

impl TeacherGuideLog {
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir.into().join(TEACHER_GUIDES_FILE))
    }
}
