use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::error::{StorageError, StorageResult};
use super::json::JsonFile;
use super::model::{Question, QuestionDraft};

pub const QUESTIONS_FILE: &str = "questions.json";

/// Question bank backed by `questions.json`.
#[derive(Debug)]
pub struct QuestionStore {
    file: JsonFile<Question>,
    lock: Mutex<()>,
}

impl QuestionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
            lock: Mutex::new(()),
        }
    }

    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir.into().join(QUESTIONS_FILE))
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    pub fn list(&self) -> StorageResult<Vec<Question>> {
        let _guard = self.lock.lock();
        self.file.load_or_create()
    }

    pub fn get(&self, id: &str) -> StorageResult<Question> {
        self.list()?
            .into_iter()
            .find(|q| q.id == id)
            .ok_or_else(|| StorageError::QuestionNotFound(id.to_string()))
    }

    pub fn create(&self, draft: QuestionDraft) -> StorageResult<Question> {
        let valid = draft.validate()?;

        let _guard = self.lock.lock();
        let mut questions = self.file.load_for_write()?;
        let question = valid.into_question(next_question_id(&questions));
        questions.push(question.clone());
        self.file.save(&questions)?;

        info!(id = %question.id, "Question created");
        Ok(question)
    }

    pub fn update(&self, id: &str, draft: QuestionDraft) -> StorageResult<Question> {
        let valid = draft.validate()?;

        let _guard = self.lock.lock();
        let mut questions = self.file.load_for_write()?;
        let question = questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| StorageError::QuestionNotFound(id.to_string()))?;
        valid.apply_to(question);
        let updated = question.clone();
        self.file.save(&questions)?;

        info!(id = %updated.id, "Question updated");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut questions = self.file.load_for_write()?;
        let before = questions.len();
        questions.retain(|q| q.id != id);
        if questions.len() == before {
            return Err(StorageError::QuestionNotFound(id.to_string()));
        }
        self.file.save(&questions)?;

        info!(id = %id, "Question deleted");
        Ok(())
    }

    pub fn increment_submission_count(&self, id: &str) -> StorageResult<Question> {
        let _guard = self.lock.lock();
        let mut questions = self.file.load_for_write()?;
        let question = questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| StorageError::QuestionNotFound(id.to_string()))?;
        question.submission_count += 1;
        let updated = question.clone();
        self.file.save(&questions)?;

        debug!(id = %id, count = updated.submission_count, "Submission count incremented");
        Ok(updated)
    }
}

/// `Q` plus the last id's numeric suffix + 1, zero-padded to three digits.
pub fn next_question_id(questions: &[Question]) -> String {
    let next = match questions.last() {
        None => 1,
        Some(last) => last
            .id
            .trim_start_matches(|c: char| !c.is_ascii_digit())
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_add(1))
            .unwrap_or(questions.len() as u64 + 1),
    };
    format!("Q{:03}", next)
}
