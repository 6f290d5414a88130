//! Text extraction from uploaded images and PDFs.

mod config;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod tesseract;


use async_trait::async_trait;
use tracing::debug;

pub use config::{
    DEFAULT_OCR_LANG, DEFAULT_OCR_TIMEOUT_SECS, DEFAULT_PDF_DPI, DEFAULT_PDFTOPPM_BIN,
    DEFAULT_TESSERACT_BIN, OcrConfig,
};
pub use error::{OcrError, OcrResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockOcr;
pub use tesseract::TesseractOcr;

const PDF_MAGIC: &[u8] = b"%PDF";

#[async_trait]
/// Turns an uploaded file into raw text.
pub trait OcrBackend: Send + Sync {
    /// Raw, untrimmed text. Callers should go through [`extract_text`].
    async fn extract(&self, file_name: &str, bytes: &[u8]) -> OcrResult<String>;
}

/// Rejects empty uploads, runs the backend and trims the result.
pub async fn extract_text(
    backend: &dyn OcrBackend,
    file_name: &str,
    bytes: &[u8],
) -> OcrResult<String> {
    if bytes.is_empty() {
        return Err(OcrError::EmptyInput);
    }
    let text = backend.extract(file_name, bytes).await?;
    let text = text.trim().to_string();
    debug!(file_name, chars = text.chars().count(), "Extracted text");
    Ok(text)
}

/// A `.pdf` name (any case) or `%PDF` magic bytes.
pub fn is_pdf(file_name: &str, bytes: &[u8]) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf") || bytes.starts_with(PDF_MAGIC)
}
