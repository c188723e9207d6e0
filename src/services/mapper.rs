//! Entity service mapper
//!
//! Translates service names between the master entity's vocabulary and any
//! other entity's, and reports gaps. Lookups are total: a miss is `None` or
//! an empty list. Mutations persist the mapping document and are audited.

use crate::audit::EntityType;
use crate::error::{QuoteError, QuoteResult};
use crate::models::{Catalog, MappingDocument, ServiceMapping};
use crate::storage::Storage;

/// Service for mapping lookups and edits
pub struct MappingService<'a> {
    storage: &'a Storage,
}

impl<'a> MappingService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn doc<R>(&self, f: impl FnOnce(&MappingDocument) -> R) -> QuoteResult<R> {
        self.storage.mappings.read(f)
    }

    fn catalog(&self) -> QuoteResult<Catalog> {
        self.storage.catalog.snapshot()
    }

    pub fn master_entity(&self) -> QuoteResult<String> {
        self.doc(|d| d.master_entity.clone())
    }

    /// Master service names in catalog order
    pub fn get_master_services(&self) -> QuoteResult<Vec<String>> {
        let catalog = self.catalog()?;
        self.doc(|d| d.master_services(&catalog))
    }

    /// Service names of an entity in catalog order; empty for unknown entities
    pub fn get_entity_services(&self, entity: &str) -> QuoteResult<Vec<String>> {
        self.storage.catalog.read(|c| c.service_names(entity))
    }

    pub fn get_mapping(&self, entity: &str, entity_service: &str) -> QuoteResult<Option<String>> {
        self.doc(|d| d.get_mapping(entity, entity_service))
    }

    pub fn get_reverse_mapping(
        &self,
        entity: &str,
        master_service: &str,
    ) -> QuoteResult<Option<String>> {
        self.doc(|d| d.get_reverse_mapping(entity, master_service))
    }

    pub fn translate_service(&self, from: &str, to: &str, name: &str) -> QuoteResult<Option<String>> {
        self.doc(|d| d.translate_service(from, to, name))
    }

    /// The whole table of an entity (empty when none exists)
    pub fn entity_table(&self, entity: &str) -> QuoteResult<ServiceMapping> {
        self.doc(|d| d.table(entity).cloned().unwrap_or_default())
    }

    /// Upsert one entry, persist and audit it
    pub fn set_mapping(
        &self,
        entity: &str,
        entity_service: &str,
        master_service: &str,
    ) -> QuoteResult<()> {
        if entity_service.trim().is_empty() || master_service.trim().is_empty() {
            return Err(QuoteError::Validation(
                "Service names in a mapping cannot be empty".into(),
            ));
        }
        if self.doc(|d| d.is_master(entity))? {
            return Err(QuoteError::Validation(format!(
                "{} is the master entity and is always mapped to itself",
                entity
            )));
        }

        let previous = self
            .storage
            .mappings
            .modify(|d| Ok(d.set_mapping(entity, entity_service, master_service)))?;

        let id = format!("{}/{}", entity, entity_service);
        match previous {
            Some(before) => self.storage.log_update(
                EntityType::ServiceMapping,
                id,
                Some(entity.to_string()),
                &before,
                &master_service.to_string(),
                Some(format!("{} -> {}", before, master_service)),
            )?,
            None => self.storage.log_create(
                EntityType::ServiceMapping,
                id,
                Some(entity.to_string()),
                &master_service,
            )?,
        }
        Ok(())
    }

    /// Delete one entry; a missing entry is a no-op
    ///
    /// Returns whether something was removed.
    pub fn remove_mapping(&self, entity: &str, entity_service: &str) -> QuoteResult<bool> {
        if self.get_mapping(entity, entity_service)?.is_none() || self.doc(|d| d.is_master(entity))? {
            return Ok(false);
        }
        let removed = self
            .storage
            .mappings
            .modify(|d| Ok(d.remove_mapping(entity, entity_service)))?;

        if let Some(master_service) = &removed {
            self.storage.log_delete(
                EntityType::ServiceMapping,
                format!("{}/{}", entity, entity_service),
                Some(entity.to_string()),
                master_service,
            )?;
        }
        Ok(removed.is_some())
    }

    /// Master services with no mapping in the entity's table
    pub fn sync_entity_to_master(&self, entity: &str) -> QuoteResult<Vec<String>> {
        let catalog = self.catalog()?;
        self.doc(|d| d.sync_entity_to_master(entity, &catalog))
    }

    /// Entity services lacking a table entry
    pub fn get_unmapped_services(&self, entity: &str) -> QuoteResult<Vec<String>> {
        let catalog = self.catalog()?;
        self.doc(|d| d.get_unmapped_services(entity, &catalog))
    }

    /// Seed an entity's table by catalog position
    ///
    /// Pairs the entity's Nth service with the master's Nth service; extra
    /// entity services stay unmapped. Every seeded pair is logged and
    /// audited so that it can be reviewed right away.
    pub fn create_entity_mappings(&self, entity: &str) -> QuoteResult<Vec<(String, String)>> {
        let catalog = self.catalog()?;
        if catalog.entity(entity).is_none() {
            return Err(QuoteError::entity_not_found(entity));
        }

        let pairs = self
            .storage
            .mappings
            .modify(|d| Ok(d.seed_by_position(entity, &catalog)))?;

        for (entity_service, master_service) in &pairs {
            tracing::info!(%entity, %entity_service, %master_service, "seeded mapping by position");
        }
        if !pairs.is_empty() {
            self.storage.log_seed(entity, &pairs)?;
        }
        Ok(pairs)
    }

    /// Identity-map a new master service into every entity lacking a mapping to it
    ///
    /// Returns the entities that were updated.
    pub fn update_all_entities_with_new_master_service(
        &self,
        new_service: &str,
    ) -> QuoteResult<Vec<String>> {
        let catalog = self.catalog()?;
        let updated = self
            .storage
            .mappings
            .modify(|d| Ok(d.add_master_service_to_all(new_service, &catalog)))?;

        for entity in &updated {
            self.storage.log_create(
                EntityType::ServiceMapping,
                format!("{}/{}", entity, new_service),
                Some(entity.clone()),
                &new_service,
            )?;
        }
        Ok(updated)
    }

    /// Drop an entity's whole table, returning it
    pub fn remove_entity_table(&self, entity: &str) -> QuoteResult<Option<ServiceMapping>> {
        if !self.doc(|d| d.mappings.contains_key(entity))? {
            return Ok(None);
        }
        let removed = self
            .storage
            .mappings
            .modify(|d| Ok(d.mappings.remove(entity)))?;
        if let Some(table) = &removed {
            self.storage.log_delete(
                EntityType::ServiceMapping,
                entity.to_string(),
                Some(entity.to_string()),
                table,
            )?;
        }
        Ok(removed)
    }
}
