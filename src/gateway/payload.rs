use serde::{Deserialize, Deserializer, Serialize};

/// Any value, `null` included, counts as present; only an absent key is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct EvaluateRequest {
    /// Accepted for context; not used in scoring.
    #[serde(default, deserialize_with = "present")]
    pub question: Option<serde_json::Value>,
    pub model_answer: Option<String>,
    pub student_answer: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EvaluateResponse {
    pub score: f64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ApiEvaluateRequest {
    pub answer: Option<String>,
    pub model_answer: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiEvaluateResponse {
    pub score: f64,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubmissionResponse {
    pub message: String,
    pub score: f64,
    pub feedback: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExtractTextResponse {
    pub extracted_text: String,
}
