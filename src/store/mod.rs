//! Document persistence.
//!
//! Each document is one JSON object behind a [`DocumentStore`]. The HTTP
//! layer only sees the trait, so tests can swap the file-backed store for
//! [`MemoryStore`].

pub mod document;
pub mod file;
pub mod memory;

use std::fmt::Debug;
use std::sync::Arc;

pub use document::{Document, DocumentKind};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::Config;
use crate::error::StoreError;

/// Load/save access to a single document.
///
/// Implementations are blocking; async callers should run them on a
/// blocking thread.
pub trait DocumentStore: Send + Sync + Debug {
    /// Which document this store holds.
    fn kind(&self) -> DocumentKind;

    /// Return the stored document, or the kind's default when nothing has
    /// been saved yet. Never creates the document.
    fn load(&self) -> Result<Document, StoreError>;

    /// Replace the stored document wholesale.
    fn save(&self, doc: &Document) -> Result<(), StoreError>;
}

/// Shared handle to a store.
pub type SharedStore = Arc<dyn DocumentStore>;

/// One store per document kind.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Contribution settings store.
    pub contribution: SharedStore,
    /// Year-to-date data store.
    pub ytd: SharedStore,
}

impl Stores {
    /// File-backed stores at the configured paths.
    pub fn from_config(config: &Config) -> Self {
        Self {
            contribution: Arc::new(FileStore::new(
                DocumentKind::Contribution,
                &config.contribution_file,
            )),
            ytd: Arc::new(FileStore::new(DocumentKind::Ytd, &config.ytd_file)),
        }
    }

    /// Fresh in-memory stores holding nothing but defaults.
    pub fn in_memory() -> Self {
        Self {
            contribution: Arc::new(MemoryStore::new(DocumentKind::Contribution)),
            ytd: Arc::new(MemoryStore::new(DocumentKind::Ytd)),
        }
    }

    /// Store for the given kind.
    pub fn get(&self, kind: DocumentKind) -> &SharedStore {
        match kind {
            DocumentKind::Contribution => &self.contribution,
            DocumentKind::Ytd => &self.ytd,
        }
    }
}
