//! OCR by shelling out to `tesseract`, with `pdftoppm` rasterizing PDFs first.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::config::OcrConfig;
use super::error::{OcrError, OcrResult};
use super::{OcrBackend, is_pdf};

const PAGE_PREFIX: &str = "page";

pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Runs `--version` on both tools and logs what is missing.
    pub async fn probe(&self) -> bool {
        let mut available = true;
        for (bin, label) in [
            (&self.config.tesseract_bin, "tesseract"),
            (&self.config.pdftoppm_bin, "pdftoppm"),
        ] {
            match self.run(bin, vec!["-v".to_string()], label).await {
                Ok(_) => debug!(tool = label, "OCR tool available"),
                Err(e) => {
                    warn!(tool = label, error = %e, "OCR tool unavailable, file extraction will fail");
                    available = false;
                }
            }
        }
        available
    }

    async fn run(&self, program: &Path, args: Vec<String>, label: &str) -> OcrResult<Vec<u8>> {
        let mut cmd = Command::new(program);
        cmd.args(&args)
            .kill_on_drop(true)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(|e| OcrError::ToolUnavailable {
            tool: label.to_string(),
            reason: e.to_string(),
        })?;

        let output = match tokio::time::timeout(self.config.timeout, child.wait_with_output()).await
        {
            Ok(res) => res?,
            Err(_) => {
                return Err(OcrError::Timeout {
                    tool: label.to_string(),
                    secs: self.config.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            return Err(OcrError::CommandFailed {
                tool: label.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }

    async fn ocr_image(&self, image: &Path) -> OcrResult<String> {
        let stdout = self
            .run(
                &self.config.tesseract_bin,
                vec![
                    image.to_string_lossy().to_string(),
                    "stdout".to_string(),
                    "-l".to_string(),
                    self.config.language.clone(),
                ],
                "tesseract",
            )
            .await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    async fn rasterize_pdf(&self, pdf: &Path, out_dir: &Path) -> OcrResult<Vec<PathBuf>> {
        let prefix = out_dir.join(PAGE_PREFIX);
        self.run(
            &self.config.pdftoppm_bin,
            vec![
                "-r".to_string(),
                self.config.pdf_dpi.to_string(),
                "-png".to_string(),
                pdf.to_string_lossy().to_string(),
                prefix.to_string_lossy().to_string(),
            ],
            "pdftoppm",
        )
        .await?;

        let mut pages = Vec::new();
        let mut entries = tokio::fs::read_dir(out_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if let Some(number) = page_number(&path) {
                pages.push((number, path));
            }
        }
        pages.sort_by_key(|(number, _)| *number);

        if pages.is_empty() {
            return Err(OcrError::NoPages);
        }
        Ok(pages.into_iter().map(|(_, path)| path).collect())
    }
}

#[async_trait]
impl OcrBackend for TesseractOcr {
    async fn extract(&self, file_name: &str, bytes: &[u8]) -> OcrResult<String> {
        let work_dir = TempDir::new()?;

        if is_pdf(file_name, bytes) {
            let pdf = work_dir.path().join("input.pdf");
            tokio::fs::write(&pdf, bytes).await?;

            let pages = self.rasterize_pdf(&pdf, work_dir.path()).await?;
            info!(pages = pages.len(), "Rasterized PDF for OCR");

            let mut texts = Vec::with_capacity(pages.len());
            for page in &pages {
                texts.push(self.ocr_image(page).await?);
            }
            return Ok(texts.join("\n"));
        }

        let image = work_dir.path().join(image_file_name(file_name));
        tokio::fs::write(&image, bytes).await?;
        self.ocr_image(&image).await
    }
}

/// Page index from a `pdftoppm` output name such as `page-3.png` or `page-03.png`.
fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (prefix, number) = stem.rsplit_once('-')?;
    if prefix != PAGE_PREFIX {
        return None;
    }
    number.parse().ok()
}

/// Keeps the upload's extension so tesseract sees a familiar file name.
fn image_file_name(file_name: &str) -> String {
    match Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        Some(ext) => format!("input.{}", ext.to_ascii_lowercase()),
        None => "input".to_string(),
    }
}
