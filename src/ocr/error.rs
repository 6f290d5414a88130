use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("uploaded file is empty")]
    EmptyInput,

    #[error("failed to spawn {tool}: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    #[error("{tool} failed: {stderr}")]
    CommandFailed { tool: String, stderr: String },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    #[error("no pages rendered from PDF")]
    NoPages,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OcrError {
    pub fn is_validation(&self) -> bool {
        matches!(self, OcrError::EmptyInput)
    }
}

pub type OcrResult<T> = Result<T, OcrError>;
