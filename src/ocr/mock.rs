use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::OcrBackend;
use super::error::{OcrError, OcrResult};

/// Returns canned text and records the file names it was asked about.
#[derive(Debug, Clone, Default)]
pub struct MockOcr {
    text: String,
    fail_with: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockOcr {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Every extraction fails with `CommandFailed` carrying `stderr`.
    pub fn failing(stderr: impl Into<String>) -> Self {
        Self {
            fail_with: Some(stderr.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl OcrBackend for MockOcr {
    async fn extract(&self, file_name: &str, _bytes: &[u8]) -> OcrResult<String> {
        self.calls.lock().push(file_name.to_string());
        match &self.fail_with {
            Some(stderr) => Err(OcrError::CommandFailed {
                tool: "mock".to_string(),
                stderr: stderr.clone(),
            }),
            None => Ok(self.text.clone()),
        }
    }
}
