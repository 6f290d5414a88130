use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Answer too long: {field} has {length} characters (max {max})")]
    AnswerTooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },
}

impl ScoringError {
    /// `true` when the caller supplied bad input (as opposed to a model/runtime failure).
    pub fn is_validation(&self) -> bool {
        matches!(self, ScoringError::AnswerTooLong { .. })
    }
}
