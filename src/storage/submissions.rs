use std::path::PathBuf;

use chrono::Local;
use parking_lot::Mutex;
use tracing::info;

use super::error::StorageResult;
use super::json::JsonFile;
use super::model::{NewSubmission, Submission};

pub const SUBMISSIONS_FILE: &str = "submissions.json";

const SUBMITTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only submission log backed by `submissions.json`.
#[derive(Debug)]
pub struct SubmissionStore {
    file: JsonFile<Submission>,
    lock: Mutex<()>,
}

impl SubmissionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
            lock: Mutex::new(()),
        }
    }

    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir.into().join(SUBMISSIONS_FILE))
    }

    pub fn append(&self, new: NewSubmission) -> StorageResult<Submission> {
        let _guard = self.lock.lock();
        let mut submissions = self.file.load_for_write()?;

        let submission = Submission {
            id: format!("S{:03}", submissions.len() + 1),
            student_id: new.student_id,
            question_id: new.question_id,
            text_answer: new.text_answer,
            file_path: new.file_path,
            score: new.score,
            feedback: new.feedback,
            submitted_at: Local::now().format(SUBMITTED_AT_FORMAT).to_string(),
        };
        submissions.push(submission.clone());
        self.file.save(&submissions)?;

        info!(
            id = %submission.id,
            question_id = %submission.question_id,
            score = submission.score,
            "Submission recorded"
        );
        Ok(submission)
    }

    pub fn list(&self) -> StorageResult<Vec<Submission>> {
        let _guard = self.lock.lock();
        self.file.load()
    }

    pub fn for_student(&self, student_id: &str) -> StorageResult<Vec<Submission>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|s| s.student_id == student_id)
            .collect())
    }
}
