//! Grader library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`HandlerState`], [`create_router_with_state`] - HTTP gateway
//!
//! ## Embedding & Scoring
//! - [`SentenceEmbedder`], [`SentenceConfig`] - Sentence embeddings (BERT + mean pooling)
//! - [`SimilarityScorer`], [`Grade`], [`Feedback`] - 0–100 answer similarity
//!
//! ## Persistence
//! - [`QuestionStore`], [`SubmissionStore`], [`AnswerLog`], [`TeacherGuideLog`] - JSON collections
//! - [`UploadStore`] - Uploaded assignment files and teacher guides
//!
//! ## Text Extraction
//! - [`OcrBackend`], [`TesseractOcr`], [`OcrConfig`] - OCR for images and PDFs
//!
//! ## Test/Mock Support
//! [`MockOcr`] is available behind `#[cfg(any(test, feature = "mock"))]`. The embedder runs
//! in stub mode when no model directory is configured.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod ocr;
pub mod scoring;
pub mod storage;

pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, MAX_ANSWER_CHARS, validate_embedding_dim};
pub use embedding::{
    EmbeddingError, SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig,
    SentenceEmbedder,
};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
#[cfg(any(test, feature = "mock"))]
pub use ocr::MockOcr;
pub use ocr::{OcrBackend, OcrConfig, OcrError, TesseractOcr, extract_text};
pub use scoring::{Feedback, Grade, ScoringError, SimilarityScorer};
pub use storage::{
    AnswerLog, AnswerRecord, Difficulty, Question, QuestionDraft, QuestionStore, StorageError,
    Submission, SubmissionStore, TeacherGuide, TeacherGuideLog, UploadStore,
};
