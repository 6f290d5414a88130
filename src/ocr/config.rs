use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TESSERACT_BIN: &str = "tesseract";
pub const DEFAULT_PDFTOPPM_BIN: &str = "pdftoppm";
pub const DEFAULT_OCR_LANG: &str = "eng";
pub const DEFAULT_PDF_DPI: u32 = 200;
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 120;

/// External OCR tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    pub tesseract_bin: PathBuf,
    pub pdftoppm_bin: PathBuf,
    /// Tesseract `-l` argument.
    pub language: String,
    pub pdf_dpi: u32,
    /// Per-command limit; a page that takes longer fails the whole extraction.
    pub timeout: Duration,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_bin: PathBuf::from(DEFAULT_TESSERACT_BIN),
            pdftoppm_bin: PathBuf::from(DEFAULT_PDFTOPPM_BIN),
            language: DEFAULT_OCR_LANG.to_string(),
            pdf_dpi: DEFAULT_PDF_DPI,
            timeout: Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS),
        }
    }
}

impl OcrConfig {
    const ENV_TESSERACT_BIN: &'static str = "GRADER_TESSERACT_BIN";
    const ENV_PDFTOPPM_BIN: &'static str = "GRADER_PDFTOPPM_BIN";
    const ENV_OCR_LANG: &'static str = "GRADER_OCR_LANG";
    const ENV_PDF_DPI: &'static str = "GRADER_PDF_DPI";
    const ENV_OCR_TIMEOUT_SECS: &'static str = "GRADER_OCR_TIMEOUT_SECS";

    /// Loads config from environment variables. Unparseable or empty values fall back
    /// to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());

        let tesseract_bin = non_empty(Self::ENV_TESSERACT_BIN)
            .map(PathBuf::from)
            .unwrap_or(defaults.tesseract_bin);
        let pdftoppm_bin = non_empty(Self::ENV_PDFTOPPM_BIN)
            .map(PathBuf::from)
            .unwrap_or(defaults.pdftoppm_bin);
        let language = non_empty(Self::ENV_OCR_LANG).unwrap_or(defaults.language);
        let pdf_dpi = non_empty(Self::ENV_PDF_DPI)
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|dpi| *dpi > 0)
            .unwrap_or(defaults.pdf_dpi);
        let timeout = non_empty(Self::ENV_OCR_TIMEOUT_SECS)
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            tesseract_bin,
            pdftoppm_bin,
            language,
            pdf_dpi,
            timeout,
        }
    }
}
