//! In-memory document store.

use std::sync::{PoisonError, RwLock};
use std::time::Instant;

use super::{Document, DocumentKind, DocumentStore};
use crate::error::StoreError;
use crate::metrics;

/// Holds a document in memory. Same semantics as the file store minus
/// persistence; useful for tests and ephemeral runs.
#[derive(Debug)]
pub struct MemoryStore {
    kind: DocumentKind,
    saved: RwLock<Option<Document>>,
}

impl MemoryStore {
    /// Empty store; loads return the kind's default until the first save.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            saved: RwLock::new(None),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn kind(&self) -> DocumentKind {
        self.kind
    }

    fn load(&self) -> Result<Document, StoreError> {
        let start = Instant::now();
        let saved = self
            .saved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let doc = match saved {
            Some(doc) => doc,
            None => {
                metrics::inc_defaults_served(self.kind);
                self.kind.default_document()
            }
        };

        let result = Ok(doc);
        metrics::record_store_op(self.kind, "load", start, &result);
        result
    }

    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let start = Instant::now();
        *self.saved.write().unwrap_or_else(PoisonError::into_inner) = Some(doc.clone());

        let result = Ok(());
        metrics::record_store_op(self.kind, "save", start, &result);
        result
    }
}
