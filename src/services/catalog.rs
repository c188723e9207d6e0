//! Entity and catalog management
//!
//! Creating, deleting and extending entities, keeping the mapping tables in
//! step with the catalog.

use serde::Serialize;

use crate::audit::EntityType;
use crate::error::{QuoteError, QuoteResult};
use crate::models::{Entity, Service};
use crate::storage::Storage;

use super::mapper::MappingService;

/// How one entity compares to the master
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncStatus {
    pub entity: String,
    pub service_count: usize,
    /// Master services the entity's catalog lacks, by name
    pub missing: Vec<String>,
}

impl SyncStatus {
    pub fn in_sync(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Result of creating an entity
#[derive(Debug, Clone)]
pub struct CreatedEntity {
    pub name: String,
    pub service_count: usize,
    /// Mapping pairs seeded by position
    pub seeded: Vec<(String, String)>,
}

/// Service for entity management
pub struct CatalogService<'a> {
    storage: &'a Storage,
}

fn validate_entity_name(name: &str) -> QuoteResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(QuoteError::Validation("Entity name cannot be empty".into()));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(QuoteError::Validation(
            "Entity name must contain only letters and numbers".into(),
        ));
    }
    Ok(name.to_ascii_uppercase())
}

impl<'a> CatalogService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn master_entity(&self) -> QuoteResult<String> {
        self.storage.mappings.read(|d| d.master_entity.clone())
    }

    pub fn list(&self) -> QuoteResult<Vec<Entity>> {
        self.storage.catalog.read(|c| c.entities.clone())
    }

    pub fn get(&self, name: &str) -> QuoteResult<Entity> {
        self.storage
            .catalog
            .read(|c| c.entity(name).cloned())?
            .ok_or_else(|| QuoteError::entity_not_found(name))
    }

    /// Create an entity, optionally copying another entity's services
    ///
    /// The name is stored upper-case and must not collide with an existing
    /// entity in any case. A non-master entity gets its mapping table
    /// seeded by position right away.
    pub fn create_entity(&self, name: &str, copy_from: Option<&str>) -> QuoteResult<CreatedEntity> {
        let name = validate_entity_name(name)?;

        let entity = self.storage.catalog.modify(|catalog| {
            let services = match copy_from {
                Some(source) => catalog
                    .entity(source)
                    .ok_or_else(|| QuoteError::entity_not_found(source))?
                    .services
                    .clone(),
                None => Vec::new(),
            };
            let entity = Entity {
                name: name.clone(),
                services,
            };
            if !catalog.add_entity(entity.clone()) {
                return Err(QuoteError::Duplicate {
                    entity_type: "Entity",
                    identifier: name.clone(),
                });
            }
            Ok(entity)
        })?;

        self.storage
            .log_create(EntityType::Entity, &name, Some(name.clone()), &entity)?;
        tracing::info!(entity = %name, services = entity.services.len(), "entity created");

        let seeded = if name == self.master_entity()? {
            Vec::new()
        } else {
            MappingService::new(self.storage).create_entity_mappings(&name)?
        };

        Ok(CreatedEntity {
            service_count: entity.services.len(),
            name,
            seeded,
        })
    }

    /// Delete a non-master entity together with its mapping table
    pub fn delete_entity(&self, name: &str) -> QuoteResult<Entity> {
        let resolved = self
            .storage
            .catalog
            .read(|c| c.entity_ignore_case(name).map(|e| e.name.clone()))?
            .ok_or_else(|| QuoteError::entity_not_found(name))?;
        let name = resolved.as_str();
        if name == self.master_entity()? {
            return Err(QuoteError::Validation(format!(
                "{} is the master entity and cannot be deleted",
                name
            )));
        }

        let removed = self.storage.catalog.modify(|catalog| {
            catalog
                .remove_entity(name)
                .ok_or_else(|| QuoteError::entity_not_found(name))
        })?;
        self.storage
            .log_delete(EntityType::Entity, name, Some(name.to_string()), &removed)?;

        MappingService::new(self.storage).remove_entity_table(name)?;
        Ok(removed)
    }

    /// Append a service to an entity's catalog
    ///
    /// A service added to the master is identity-mapped into every other
    /// entity; the entities updated that way are returned.
    pub fn add_service(&self, entity: &str, service: Service) -> QuoteResult<Vec<String>> {
        service
            .validate()
            .map_err(|e| QuoteError::Validation(e.to_string()))?;

        let entity_name = self.storage.catalog.modify(|catalog| {
            let resolved = catalog
                .entity_ignore_case(entity)
                .map(|e| e.name.clone())
                .ok_or_else(|| QuoteError::entity_not_found(entity))?;
            let target = catalog
                .entity_mut(&resolved)
                .ok_or_else(|| QuoteError::entity_not_found(entity))?;
            if target.has_service(&service.name) {
                return Err(QuoteError::Duplicate {
                    entity_type: "Service",
                    identifier: service.name.clone(),
                });
            }
            target.services.push(service.clone());
            Ok(resolved)
        })?;

        self.storage.log_create(
            EntityType::Service,
            format!("{}/{}", entity_name, service.name),
            Some(service.name.clone()),
            &service,
        )?;

        if entity_name == self.master_entity()? {
            MappingService::new(self.storage)
                .update_all_entities_with_new_master_service(&service.name)
        } else {
            Ok(Vec::new())
        }
    }

    /// Compare every non-master entity's catalog with the master's
    pub fn sync_status(&self) -> QuoteResult<Vec<SyncStatus>> {
        let master = self.master_entity()?;
        self.storage.catalog.read(|catalog| {
            let master_services = catalog.service_names(&master);
            catalog
                .entities
                .iter()
                .filter(|e| e.name != master)
                .map(|e| SyncStatus {
                    entity: e.name.clone(),
                    service_count: e.services.len(),
                    missing: master_services
                        .iter()
                        .filter(|s| !e.has_service(s))
                        .cloned()
                        .collect(),
                })
                .collect()
        })
    }

    /// Give every entity the master services it lacks
    ///
    /// Missing services are appended with the master's data and mapped to
    /// themselves; the entity-side name can be corrected afterwards.
    /// Returns the services added per entity.
    pub fn sync_all(&self) -> QuoteResult<Vec<(String, Vec<String>)>> {
        let master = self.master_entity()?;
        let master_entity = self
            .storage
            .catalog
            .read(|c| c.entity(&master).cloned())?
            .ok_or_else(|| QuoteError::entity_not_found(&master))?;

        let added: Vec<(String, Vec<Service>)> = self.storage.catalog.modify(|catalog| {
            let mut added = Vec::new();
            for entity in catalog.entities.iter_mut().filter(|e| e.name != master) {
                let missing: Vec<Service> = master_entity
                    .services
                    .iter()
                    .filter(|s| !entity.has_service(&s.name))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    entity.services.extend(missing.iter().cloned());
                    added.push((entity.name.clone(), missing));
                }
            }
            Ok(added)
        })?;

        let mapper = MappingService::new(self.storage);
        let mut report = Vec::with_capacity(added.len());
        for (entity, services) in added {
            for service in &services {
                self.storage.log_create(
                    EntityType::Service,
                    format!("{}/{}", entity, service.name),
                    Some(service.name.clone()),
                    service,
                )?;
                mapper.set_mapping(&entity, &service.name, &service.name)?;
            }
            tracing::info!(%entity, added = services.len(), "entity synced to master");
            report.push((entity, services.into_iter().map(|s| s.name).collect()));
        }
        Ok(report)
    }
}
