//! Sentence embedder (BERT encoder + mean pooling).
//!
//! Use [`SentenceConfig::stub`] for tests/examples without model files.

/// Sentence embedder configuration.
pub mod config;


pub use config::{SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig};

use std::sync::Arc;

use candle_core::{Device, Tensor};
use tracing::{debug, info, warn};

use crate::constants::validate_embedding_dim;
use crate::embedding::bert::BertEncoder;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::pooling::{l2_normalize, mean_pool};
use crate::embedding::utils::load_tokenizer_fixed_window;

/// Stand-in token used by the stub backend when a text has no words.
const STUB_EMPTY_TOKEN: &str = "[EMPTY]";

enum EmbedderBackend {
    Model {
        encoder: BertEncoder,
        tokenizer: Arc<tokenizers::Tokenizer>,
        device: Device,
    },
    Stub {
        device: Device,
    },
}

/// Produces one L2-normalized vector per input text.
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: SentenceConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub { device } => format!("Stub({:?})", device),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: SentenceConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for sentence embedder");

        if config.testing_stub {
            warn!("Sentence embedder running in STUB mode (no model files loaded)");
            return Ok(Self {
                backend: EmbedderBackend::Stub { device },
                config,
            });
        }

        let (encoder, tokenizer) = Self::load_model(&config, &device)?;

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Sentence embedding model loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                encoder,
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    fn load_model(
        config: &SentenceConfig,
        device: &Device,
    ) -> Result<(BertEncoder, tokenizers::Tokenizer), EmbeddingError> {
        let tokenizer = load_tokenizer_fixed_window(&config.model_dir, config.max_seq_len)
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        let encoder = BertEncoder::load(&config.model_dir, device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            }
        })?;

        validate_embedding_dim(encoder.hidden_size(), config.embedding_dim).map_err(|e| {
            EmbeddingError::InvalidConfig {
                reason: e.to_string(),
            }
        })?;

        Ok((encoder, tokenizer))
    }

    /// Embeds a single string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text])?;
        vectors.pop().ok_or_else(|| EmbeddingError::InferenceFailed {
            reason: "encoder returned no vectors".to_string(),
        })
    }

    /// Embeds a batch of strings; the output order matches the input order.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            } => self.embed_batch_with_model(texts, encoder, tokenizer, device),
            EmbedderBackend::Stub { device } => self.embed_batch_stub(texts, device),
        }
    }

    fn embed_batch_with_model(
        &self,
        texts: &[&str],
        encoder: &BertEncoder,
        tokenizer: &tokenizers::Tokenizer,
        device: &Device,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encodings = tokenizer.encode_batch(texts.to_vec(), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let mut ids = Vec::with_capacity(encodings.len());
        let mut masks = Vec::with_capacity(encodings.len());
        for encoding in &encodings {
            ids.push(Tensor::new(encoding.get_ids(), device)?);
            masks.push(Tensor::new(encoding.get_attention_mask(), device)?);
        }

        let input_ids = Tensor::stack(&ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;

        debug!(
            batch = texts.len(),
            seq_len = self.config.max_seq_len,
            "Encoding sentences (transformer forward pass)"
        );

        let hidden_states = encoder
            .forward(&input_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Transformer forward pass failed: {}", e),
            })?;

        let pooled = mean_pool(&hidden_states, &attention_mask)?;
        let normalized = l2_normalize(&pooled)?;

        Ok(normalized.to_vec2::<f32>()?)
    }

    /// Hashing bag-of-words stand-in for the transformer.
    ///
    /// Each word maps to a deterministic pseudo-random vector; the sentence vector goes
    /// through the same pooling and normalization as real hidden states, so identical texts
    /// produce identical vectors and shared vocabulary raises similarity.
    fn embed_batch_stub(
        &self,
        texts: &[&str],
        device: &Device,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let dim = self.config.embedding_dim;
        let window = self.config.max_seq_len;

        let mut rows = Vec::with_capacity(texts.len() * window * dim);
        let mut mask = Vec::with_capacity(texts.len() * window);

        for text in texts {
            let lowered = text.to_lowercase();
            let mut words: Vec<&str> = lowered
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
                .take(window)
                .collect();
            if words.is_empty() {
                words.push(STUB_EMPTY_TOKEN);
            }

            debug!(text_len = text.len(), words = words.len(), "Generating stub embedding");

            for position in 0..window {
                match words.get(position) {
                    Some(word) => {
                        rows.extend(stub_token_vector(word, dim));
                        mask.push(1u32);
                    }
                    None => {
                        rows.extend(std::iter::repeat_n(0.0f32, dim));
                        mask.push(0u32);
                    }
                }
            }
        }

        let hidden = Tensor::from_vec(rows, (texts.len(), window, dim), device)?;
        let attention_mask = Tensor::from_vec(mask, (texts.len(), window), device)?;

        let pooled = mean_pool(&hidden, &attention_mask)?;
        let normalized = l2_normalize(&pooled)?;

        Ok(normalized.to_vec2::<f32>()?)
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub { .. })
    }

    /// Returns `true` if a model is loaded.
    pub fn has_model(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Model { .. })
    }

    /// Returns the compute device in use.
    pub fn device(&self) -> &Device {
        match &self.backend {
            EmbedderBackend::Model { device, .. } | EmbedderBackend::Stub { device } => device,
        }
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &SentenceConfig {
        &self.config
    }
}

fn stub_token_vector(word: &str, dim: usize) -> impl Iterator<Item = f32> {
    use std::hash::{DefaultHasher, Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    word.hash(&mut hasher);
    let mut state = hasher.finish();

    (0..dim).map(move |_| {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
    })
}
