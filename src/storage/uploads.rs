use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::error::{StorageError, StorageResult};

pub const UPLOADS_DIR: &str = "uploads";
pub const ASSIGNMENTS_DIR: &str = "assignments";
pub const TEACHER_GUIDES_DIR: &str = "teacher_guides";

/// Uploaded files under `<data_dir>/uploads`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: data_dir.into().join(UPLOADS_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn assignments_dir(&self) -> PathBuf {
        self.root.join(ASSIGNMENTS_DIR)
    }

    pub fn teacher_guides_dir(&self) -> PathBuf {
        self.root.join(TEACHER_GUIDES_DIR)
    }

    /// Stores a teacher guide under its base name, replacing any previous file of that name.
    pub async fn save_teacher_guide(&self, file_name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        let name = sanitize_file_name(file_name)?;
        write_file(&self.teacher_guides_dir(), &name, bytes).await
    }

    /// Stores an assignment file. Names are prefixed with a random id so students
    /// uploading `answer.png` do not overwrite each other.
    pub async fn save_assignment(&self, file_name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        let name = sanitize_file_name(file_name)?;
        let unique = format!("{}_{}", Uuid::new_v4().simple(), name);
        write_file(&self.assignments_dir(), &unique, bytes).await
    }
}

async fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| StorageError::io(dir, e))?;
    let path = dir.join(name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| StorageError::io(&path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Upload saved");
    Ok(path)
}

/// Reduces a client-supplied file name to its last path component.
pub fn sanitize_file_name(raw: &str) -> StorageResult<String> {
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
        return Err(StorageError::InvalidFileName(raw.to_string()));
    }
    Ok(base.to_string())
}
