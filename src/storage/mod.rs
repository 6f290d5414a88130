//! Flat-file persistence: JSON collections and uploaded files.

pub mod error;
mod json;
mod log;
mod model;
mod questions;
mod submissions;
mod uploads;


pub use error::{StorageError, StorageResult};
pub use json::JsonFile;
pub use log::{ANSWERS_FILE, AnswerLog, RecordLog, TEACHER_GUIDES_FILE, TeacherGuideLog};
pub use model::{
    AnswerRecord, Difficulty, DraftError, NewSubmission, Question, QuestionDraft, Submission,
    TeacherGuide, ValidDraft,
};
pub use questions::{QUESTIONS_FILE, QuestionStore, next_question_id};
pub use submissions::{SUBMISSIONS_FILE, SubmissionStore};
pub use uploads::{UploadStore, sanitize_file_name};
