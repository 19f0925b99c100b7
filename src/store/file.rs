//! File-backed document store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use tracing::debug;

use super::{Document, DocumentKind, DocumentStore};
use crate::error::StoreError;
use crate::metrics;

/// Stores one document as a JSON file.
///
/// Writes are a plain truncate-and-write with no temp file or fsync. Access
/// from this process is serialized by a mutex, so concurrent saves never
/// interleave bytes and the last writer wins. Other processes writing the
/// same file are not coordinated with.
#[derive(Debug)]
pub struct FileStore {
    kind: DocumentKind,
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store for `kind` backed by `path`. The file is not touched.
    pub fn new(kind: DocumentKind, path: impl AsRef<Path>) -> Self {
        Self {
            kind,
            path: path.as_ref().to_path_buf(),
            io_lock: Mutex::new(()),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            kind: self.kind,
            path: self.path.clone(),
            source,
        }
    }

    fn read_locked(&self) -> Result<Document, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(document = %self.kind, path = %self.path.display(), "no file, serving default");
                metrics::inc_defaults_served(self.kind);
                return Ok(self.kind.default_document());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            kind: self.kind,
            path: self.path.clone(),
            source,
        })
    }
}

impl DocumentStore for FileStore {
    fn kind(&self) -> DocumentKind {
        self.kind
    }

    fn load(&self) -> Result<Document, StoreError> {
        let start = Instant::now();
        let result = {
            let _guard = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.read_locked()
        };
        metrics::record_store_op(self.kind, "load", start, &result);
        result
    }

    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let start = Instant::now();
        let result = serde_json::to_vec(doc)
            .map_err(|source| StoreError::Encode {
                kind: self.kind,
                source,
            })
            .and_then(|bytes| {
                let _guard = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);
                fs::write(&self.path, bytes).map_err(|e| self.io_error(e))
            });

        if result.is_ok() {
            debug!(document = %self.kind, path = %self.path.display(), fields = doc.len(), "document saved");
        }
        metrics::record_store_op(self.kind, "save", start, &result);
        result
    }
}
