//! Whole-file JSON persistence for an ordered collection of records.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};

/// A JSON array of `T` stored in a single file.
///
/// Reads are tolerant: a missing or unparseable file is an empty collection and unreadable
/// records are skipped. Read-modify-write cycles load strictly and refuse to replace a file
/// they could not fully parse. Writes replace the whole file atomically (temp file in the same directory, fsync, rename). This type does
/// no locking; callers serialize read-modify-write cycles themselves.
#[derive(Debug)]
pub struct JsonFile<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every readable record.
    ///
    /// A missing file or one that is not a JSON array yields an empty vector; records that
    /// do not match `T` are skipped. Use [`load_for_write`](Self::load_for_write) before
    /// saving so skipped records are never dropped from disk.
    pub fn load(&self) -> StorageResult<Vec<T>> {
        let Some(bytes) = self.read_bytes()? else {
            return Ok(Vec::new());
        };

        let raw = match serde_json::from_slice::<Vec<serde_json::Value>>(&bytes) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Collection file is not a JSON array, treating as empty"
                );
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<T>(value) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    path = %self.path.display(),
                    index,
                    error = %e,
                    "Skipping unreadable record"
                ),
            }
        }
        Ok(records)
    }

    /// Loads every record for a read-modify-write cycle.
    ///
    /// Fails with [`StorageError::Unreadable`] unless the whole file parses, so a later
    /// [`save`](Self::save) cannot discard records this build does not understand. A missing
    /// or blank file is an empty collection.
    pub fn load_for_write(&self) -> StorageResult<Vec<T>> {
        let Some(bytes) = self.read_bytes()? else {
            return Ok(Vec::new());
        };

        serde_json::from_slice::<Vec<T>>(&bytes).map_err(|e| StorageError::Unreadable {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Like [`load`](Self::load), but writes an empty array first if the file is missing.
    pub fn load_or_create(&self) -> StorageResult<Vec<T>> {
        if !self.path.exists() {
            self.save(&[])?;
            debug!(path = %self.path.display(), "Created empty collection file");
            return Ok(Vec::new());
        }
        self.load()
    }

    /// File contents, or `None` when the file is missing or blank.
    fn read_bytes(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Collection file missing, treating as empty");
                Ok(None)
            }
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    /// Atomically replaces the file contents with `records`.
    pub fn save(&self, records: &[T]) -> StorageResult<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| StorageError::io(&parent, e))?;

        let temp = NamedTempFile::new_in(&parent).map_err(|e| StorageError::io(&parent, e))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, records).map_err(|e| {
                StorageError::Serialization {
                    path: self.path.clone(),
                    reason: e.to_string(),
                }
            })?;
            writer
                .flush()
                .map_err(|e| StorageError::io(temp.path(), e))?;
        }
        temp.as_file()
            .sync_all()
            .map_err(|e| StorageError::io(temp.path(), e))?;

        temp.persist(&self.path)
            .map_err(|e| StorageError::io(&self.path, e.error))?;

        debug!(path = %self.path.display(), records = records.len(), "Collection saved");
        Ok(())
    }
}
