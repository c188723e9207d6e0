//! Storage layer for quotedesk
//!
//! Four independent JSON documents (catalog, mappings, workflows, service
//! configuration) plus the audit log. Catalog and mappings are checked
//! against each other when loaded, never when mutated.

pub mod documents;
pub mod file_io;
pub mod init;

pub use documents::{
    CatalogRepository, DocumentRepository, MappingRepository, ServiceConfigRepository,
    WorkflowRepository,
};
pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, InitReport, DEFAULT_ACCOUNT};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::QuotePaths;
use crate::error::{QuoteError, QuoteResult};
use crate::models::{Catalog, MappingDocument};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: QuotePaths,
    pub catalog: CatalogRepository,
    pub mappings: MappingRepository,
    pub workflows: WorkflowRepository,
    pub service_config: ServiceConfigRepository,
    audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: QuotePaths) -> QuoteResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            catalog: CatalogRepository::new(paths.catalog_file()),
            mappings: MappingRepository::new(paths.mappings_file()),
            workflows: WorkflowRepository::new(paths.workflows_file()),
            service_config: ServiceConfigRepository::new(paths.service_config_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &QuotePaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load every document and cross-check catalog and mappings
    ///
    /// Returns the non-fatal findings, which are also logged.
    pub fn load_all(&self) -> QuoteResult<Vec<String>> {
        self.catalog.load()?;
        self.mappings.load()?;
        self.workflows.load()?;
        self.service_config.load()?;

        let catalog = self.catalog.snapshot()?;
        let findings = self
            .mappings
            .read(|doc| validate_references(&catalog, doc))??;
        for finding in &findings {
            tracing::warn!(%finding, "mapping reference check");
        }
        Ok(findings)
    }

    /// Check if quotedesk has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> QuoteResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> QuoteResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> QuoteResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_seed(&self, entity: &str, pairs: &[(String, String)]) -> QuoteResult<()> {
        self.audit.log(&AuditEntry::seed(entity, pairs))
    }
}

/// Cross-check the mapping document against the catalog
///
/// A non-empty catalog without the master entity is fatal. Tables for
/// unknown entities, keys naming services the entity does not have, and
/// values naming services the master does not have are reported.
pub fn validate_references(catalog: &Catalog, doc: &MappingDocument) -> QuoteResult<Vec<String>> {
    if catalog.is_empty() {
        return Ok(Vec::new());
    }

    let master = catalog.entity(&doc.master_entity).ok_or_else(|| {
        QuoteError::Validation(format!(
            "Master entity '{}' is not in the catalog",
            doc.master_entity
        ))
    })?;

    let mut findings = Vec::new();
    for (entity_name, table) in &doc.mappings {
        let Some(entity) = catalog.entity(entity_name) else {
            findings.push(format!("mapping table for unknown entity '{}'", entity_name));
            continue;
        };
        for (entity_service, master_service) in table.iter() {
            if !entity.has_service(entity_service) {
                findings.push(format!(
                    "{}: mapped service '{}' is not in the entity catalog",
                    entity_name, entity_service
                ));
            }
            if !master.has_service(master_service) {
                findings.push(format!(
                    "{}: '{}' maps to '{}', which is not a master service",
                    entity_name, entity_service, master_service
                ));
            }
        }
    }
    Ok(findings)
}
