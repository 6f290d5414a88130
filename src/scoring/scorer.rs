use tracing::{debug, info};

use crate::constants::{COSINE_EPS, MAX_ANSWER_CHARS, MAX_SCORE, MIN_SCORE};
use crate::embedding::{SentenceConfig, SentenceEmbedder};

use super::error::ScoringError;
use super::types::Grade;

/// Characters at which the length heuristic saturates.
const LENGTH_SCORE_SATURATION: f64 = 1000.0;

pub struct SimilarityScorer {
    embedder: SentenceEmbedder,
}

impl std::fmt::Debug for SimilarityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityScorer")
            .field("embedder", &self.embedder)
            .finish()
    }
}

impl SimilarityScorer {
    pub fn new(config: SentenceConfig) -> Result<Self, ScoringError> {
        let embedder = SentenceEmbedder::load(config)?;
        Ok(Self::from_embedder(embedder))
    }

    pub fn stub() -> Result<Self, ScoringError> {
        Self::new(SentenceConfig::stub())
    }

    pub fn from_embedder(embedder: SentenceEmbedder) -> Self {
        info!(stub = embedder.is_stub(), "Similarity scorer ready");
        Self { embedder }
    }

    pub fn embedder(&self) -> &SentenceEmbedder {
        &self.embedder
    }

    pub fn is_stub(&self) -> bool {
        self.embedder.is_stub()
    }

    /// Rejects answers longer than [`MAX_ANSWER_CHARS`] characters.
    pub fn validate_answer(field: &'static str, text: &str) -> Result<(), ScoringError> {
        let length = text.chars().count();
        if length > MAX_ANSWER_CHARS {
            return Err(ScoringError::AnswerTooLong {
                field,
                length,
                max: MAX_ANSWER_CHARS,
            });
        }
        Ok(())
    }

    /// Similarity of `candidate` to `reference` on the 0–100 scale.
    pub fn score(&self, reference: &str, candidate: &str) -> Result<f64, ScoringError> {
        Self::validate_answer("model_answer", reference)?;
        Self::validate_answer("student_answer", candidate)?;

        let vectors = self.embedder.embed_batch(&[reference, candidate])?;
        let [reference_vec, candidate_vec] = vectors.as_slice() else {
            return Err(ScoringError::ComputationFailed {
                reason: format!("expected 2 embeddings, got {}", vectors.len()),
            });
        };

        if reference_vec.len() != candidate_vec.len() {
            return Err(ScoringError::ComputationFailed {
                reason: format!(
                    "embedding length mismatch: {} vs {}",
                    reference_vec.len(),
                    candidate_vec.len()
                ),
            });
        }

        let cosine = cosine_similarity(reference_vec, candidate_vec);
        let score = scale_similarity(cosine);

        debug!(
            reference_len = reference.len(),
            candidate_len = candidate.len(),
            cosine = cosine,
            score = score,
            "Scored answer pair"
        );

        Ok(score)
    }

    /// [`score`](Self::score) plus the matching feedback band.
    pub fn grade(&self, reference: &str, candidate: &str) -> Result<Grade, ScoringError> {
        Ok(Grade::new(self.score(reference, candidate)?))
    }
}

/// Cosine similarity with the norm product floored at [`COSINE_EPS`].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (norm_a * norm_b).max(COSINE_EPS)
}

/// Scales a cosine similarity to 0–100, clamps, and rounds to two decimals.
///
/// Scaling and clamping happen in `f32` (the precision the model produces); rounding
/// happens on the widened `f64`. NaN maps to the minimum score.
pub fn scale_similarity(cosine: f32) -> f64 {
    let scaled = cosine * 100.0;
    if scaled.is_nan() {
        return MIN_SCORE;
    }
    let clamped = scaled.clamp(MIN_SCORE as f32, MAX_SCORE as f32);
    round_to_hundredths(f64::from(clamped))
}

/// Rounds to two decimal places using correctly-rounded decimal formatting
/// (ties resolve on the exact binary value, not on `x * 100`).
pub fn round_to_hundredths(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Length-only heuristic used when no reference answer is available.
///
/// Returns `min(chars / 1000, 1)` on the 0–100 scale. It says nothing about correctness.
pub fn length_score(text: &str) -> f64 {
    let ratio = (text.chars().count() as f64 / LENGTH_SCORE_SATURATION).min(1.0);
    round_to_hundredths(ratio * MAX_SCORE)
}
