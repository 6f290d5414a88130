//! Tensor-level pooling used to turn token embeddings into one sentence vector.

use candle_core::{DType, Result, Tensor};

use crate::constants::{NORMALIZE_EPS, POOLING_MASK_EPS};

/// Attention-mask weighted mean over the sequence axis.
///
/// `hidden` is `[batch, seq, dim]`, `attention_mask` is `[batch, seq]` (any numeric dtype).
/// Padding positions contribute nothing; an all-padding row yields a zero vector instead of
/// dividing by zero.
pub fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let mask = attention_mask
        .to_dtype(hidden.dtype())?
        .unsqueeze(2)?
        .broadcast_as(hidden.shape())?;

    let summed = (hidden * &mask)?.sum(1)?;
    let counts = mask.sum(1)?.maximum(POOLING_MASK_EPS)?;
    summed / counts
}

/// Row-wise L2 normalization of a `[batch, dim]` tensor.
pub fn l2_normalize(vectors: &Tensor) -> Result<Tensor> {
    let norm = vectors
        .to_dtype(DType::F32)?
        .sqr()?
        .sum_keepdim(1)?
        .sqrt()?
        .maximum(NORMALIZE_EPS)?;
    vectors.to_dtype(DType::F32)?.broadcast_div(&norm)
}
