//! Document repositories
//!
//! Each persisted document (catalog, mappings, workflows, service
//! configuration) lives in memory behind a lock and is written back whole.
//! Mutations run against a copy; the copy is committed to memory only after
//! it reached disk, so memory never holds state the file does not.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{QuoteError, QuoteResult};
use crate::models::{Catalog, MappingDocument, ServiceConfigDocument, WorkflowBook};

use super::file_io::{read_json, write_json_atomic};

pub type CatalogRepository = DocumentRepository<Catalog>;
pub type MappingRepository = DocumentRepository<MappingDocument>;
pub type WorkflowRepository = DocumentRepository<WorkflowBook>;
pub type ServiceConfigRepository = DocumentRepository<ServiceConfigDocument>;

/// One JSON document held in memory
pub struct DocumentRepository<T> {
    path: PathBuf,
    data: RwLock<T>,
}

impl<T> DocumentRepository<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(T::default()),
        }
    }

    /// Load the document from disk (defaults when the file is absent)
    pub fn load(&self) -> QuoteResult<()> {
        let loaded: T = read_json(&self.path)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| QuoteError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = loaded;
        Ok(())
    }

    /// Run a read-only closure against the document
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> QuoteResult<R> {
        let data = self
            .data
            .read()
            .map_err(|e| QuoteError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(f(&data))
    }

    /// A copy of the current document
    pub fn snapshot(&self) -> QuoteResult<T> {
        self.read(T::clone)
    }

    /// Apply a change, persist it, then commit it to memory
    ///
    /// The write lock is held for the whole cycle so concurrent callers
    /// serialize their read-modify-write-persist sequences. If the closure
    /// or the write fails, the in-memory document is left unchanged.
    pub fn modify<R>(&self, f: impl FnOnce(&mut T) -> QuoteResult<R>) -> QuoteResult<R> {
        let mut data = self
            .data
            .write()
            .map_err(|e| QuoteError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut draft = data.clone();
        let result = f(&mut draft)?;
        write_json_atomic(&self.path, &draft)?;
        *data = draft;
        Ok(result)
    }
}
