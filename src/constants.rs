//! Cross-cutting, shared constants.
//!
//! The scoring pipeline constants below are part of the observable contract: changing any
//! of them changes the scores clients see for the same pair of answers.

/// Hidden size of `sentence-transformers/all-MiniLM-L6-v2`.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Every input is padded to, and truncated at, this many tokens before encoding.
pub const DEFAULT_MAX_SEQ_LEN: usize = 50;

/// Longest accepted answer, counted in characters (not bytes).
pub const MAX_ANSWER_CHARS: usize = 512;

/// Floor for the attention-mask sum during mean pooling.
pub const POOLING_MASK_EPS: f64 = 1e-9;

/// Floor for the vector norm during L2 normalization.
pub const NORMALIZE_EPS: f64 = 1e-12;

/// Floor for the norm product in cosine similarity.
pub const COSINE_EPS: f32 = 1e-8;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Default model identifier, used for logging and the readiness report.
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Error returned when a runtime dimension does not match what a module expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use grader::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
