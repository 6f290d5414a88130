use std::path::PathBuf;
use thiserror::Error;

use super::model::DraftError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed for {path}: {reason}")]
    Serialization { path: PathBuf, reason: String },

    #[error("refusing to overwrite {path}, existing records could not be read: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("Question not found")]
    QuestionNotFound(String),

    #[error(transparent)]
    InvalidDraft(#[from] DraftError),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::QuestionNotFound(_))
    }

    /// Errors caused by the caller's input rather than the filesystem.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StorageError::InvalidDraft(_) | StorageError::InvalidFileName(_)
        )
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
