//! Answer scoring.
//!
//! [`SimilarityScorer`] embeds a reference answer and a student answer with the
//! [`SentenceEmbedder`](crate::embedding::SentenceEmbedder), takes the cosine similarity of
//! the two unit vectors and reports it on a 0–100 scale rounded to two decimals.
//! [`Feedback`] maps that score onto the fixed feedback bands shown to students.
//!
//! Every HTTP surface that produces a score goes through the same scorer instance.

pub mod error;
pub mod scorer;
pub mod types;


pub use error::ScoringError;
pub use scorer::{
    SimilarityScorer, cosine_similarity, length_score, round_to_hundredths, scale_similarity,
};
pub use types::{Feedback, Grade};
