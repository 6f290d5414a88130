//! Persisted record types.
//!
//! Questions use camelCase field names, submissions snake_case; both match the files the
//! frontend already reads.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::constants::MAX_ANSWER_CHARS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive; anything unrecognised is `Medium`, as the frontend displays it.
    pub fn from_stored(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

/// Stored files may carry hand-edited difficulties such as `"medium"`.
fn stored_difficulty<'de, D>(deserializer: D) -> Result<Difficulty, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|raw| raw.as_deref().map(Difficulty::from_stored).unwrap_or_default())
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub correct_answer: String,
    #[serde(default, deserialize_with = "stored_difficulty")]
    pub difficulty: Difficulty,
    pub point_value: u32,
    #[serde(default)]
    pub has_reference: bool,
    #[serde(default)]
    pub submission_count: u64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Minutes allowed, if limited.
    #[serde(default)]
    pub time_limit: Option<u32>,
    #[serde(default = "default_true")]
    pub allow_file_upload: bool,
    #[serde(default = "default_true")]
    pub allow_text_answer: bool,
    #[serde(default)]
    pub due_date: String,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Create/update payload for a question, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub text: Option<String>,
    pub correct_answer: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub point_value: Option<u32>,
    pub has_reference: Option<bool>,
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub time_limit: Option<Option<u32>>,
    pub allow_file_upload: Option<bool>,
    pub allow_text_answer: Option<bool>,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("correctAnswer is too long: {length} characters (max {max})")]
    AnswerTooLong { length: usize, max: usize },
}

/// A [`QuestionDraft`] whose required fields are present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub text: String,
    pub correct_answer: String,
    pub difficulty: Difficulty,
    pub point_value: u32,
    rest: QuestionDraft,
}

impl QuestionDraft {
    /// Checks the four required fields and the reference answer length.
    pub fn validate(self) -> Result<ValidDraft, DraftError> {
        let mut missing = Vec::new();
        if self.text.is_none() {
            missing.push("text");
        }
        if self.correct_answer.is_none() {
            missing.push("correctAnswer");
        }
        if self.difficulty.is_none() {
            missing.push("difficulty");
        }
        if self.point_value.is_none() {
            missing.push("pointValue");
        }

        let (Some(text), Some(correct_answer), Some(difficulty), Some(point_value)) = (
            self.text.clone(),
            self.correct_answer.clone(),
            self.difficulty,
            self.point_value,
        ) else {
            return Err(DraftError::MissingFields(missing));
        };

        let length = correct_answer.chars().count();
        if length > MAX_ANSWER_CHARS {
            return Err(DraftError::AnswerTooLong {
                length,
                max: MAX_ANSWER_CHARS,
            });
        }

        Ok(ValidDraft {
            text,
            correct_answer,
            difficulty,
            point_value,
            rest: self,
        })
    }
}

impl ValidDraft {
    /// Builds a fresh question; unspecified optional fields take their defaults.
    pub fn into_question(self, id: String) -> Question {
        let rest = self.rest;
        Question {
            id,
            text: self.text,
            correct_answer: self.correct_answer,
            difficulty: self.difficulty,
            point_value: self.point_value,
            has_reference: rest.has_reference.unwrap_or(false),
            submission_count: 0,
            is_active: rest.is_active.unwrap_or(true),
            tags: rest.tags.unwrap_or_default(),
            time_limit: rest.time_limit.flatten(),
            allow_file_upload: rest.allow_file_upload.unwrap_or(true),
            allow_text_answer: rest.allow_text_answer.unwrap_or(true),
            due_date: rest.due_date.unwrap_or_default(),
        }
    }

    /// Overwrites required fields and any optional field present in the draft.
    pub fn apply_to(self, question: &mut Question) {
        let rest = self.rest;
        question.text = self.text;
        question.correct_answer = self.correct_answer;
        question.difficulty = self.difficulty;
        question.point_value = self.point_value;
        if let Some(v) = rest.has_reference {
            question.has_reference = v;
        }
        if let Some(v) = rest.is_active {
            question.is_active = v;
        }
        if let Some(v) = rest.tags {
            question.tags = v;
        }
        if let Some(v) = rest.time_limit {
            question.time_limit = v;
        }
        if let Some(v) = rest.allow_file_upload {
            question.allow_file_upload = v;
        }
        if let Some(v) = rest.allow_text_answer {
            question.allow_text_answer = v;
        }
        if let Some(v) = rest.due_date {
            question.due_date = v;
        }
    }
}

/// Accepts `"42"` or `42` so hand-edited files keep working.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub student_id: String,
    pub question_id: String,
    pub text_answer: Option<String>,
    pub file_path: Option<String>,
    pub score: f64,
    pub feedback: String,
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub submitted_at: String,
}

/// Submission fields supplied by the caller; id and timestamp are assigned on append.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub student_id: String,
    pub question_id: String,
    pub text_answer: Option<String>,
    pub file_path: Option<String>,
    pub score: f64,
    pub feedback: String,
}

/// One `/api/evaluate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: u64,
    pub text: String,
    pub score: f64,
    /// RFC 3339, UTC.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherGuide {
    pub id: u64,
    pub file_path: String,
    /// RFC 3339, UTC.
    pub uploaded_at: String,
}
