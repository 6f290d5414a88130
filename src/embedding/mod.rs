//! Embedding + model utilities.
//!
//! - [`sentence`] turns text into normalized sentence vectors.
//! - [`pooling`] holds the tensor math shared by the real and stub backends.

/// BERT encoder wrapper used by the sentence embedder.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Mean pooling and L2 normalization.
pub mod pooling;
/// Sentence embedder.
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;

pub use error::EmbeddingError;
pub use sentence::{
    SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig, SentenceEmbedder,
};
