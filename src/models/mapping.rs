//! Entity service mapping tables
//!
//! Every non-master entity has a table `entity_service -> master_service`.
//! Tables keep insertion order so that reverse lookups resolve ambiguous
//! aliases deterministically: the first inserted key wins.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::catalog::Catalog;

/// Default master entity name
pub const DEFAULT_MASTER_ENTITY: &str = "TPUS";

/// Insertion-ordered `entity_service -> master_service` table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceMapping {
    entries: Vec<(String, String)>,
}

impl ServiceMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Master name for an entity service
    pub fn get(&self, entity_service: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == entity_service)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, entity_service: &str) -> bool {
        self.get(entity_service).is_some()
    }

    /// Insert or replace; an existing key keeps its position
    ///
    /// Returns the previous master name.
    pub fn insert(&mut self, entity_service: String, master_service: String) -> Option<String> {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == entity_service) {
            return Some(std::mem::replace(&mut entry.1, master_service));
        }
        self.entries.push((entity_service, master_service));
        None
    }

    /// Remove a key, returning its master name
    pub fn remove(&mut self, entity_service: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == entity_service)?;
        Some(self.entries.remove(index).1)
    }

    /// First entity service (in insertion order) mapped to `master_service`
    pub fn reverse(&self, master_service: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| v == master_service)
            .map(|(k, _)| k.as_str())
    }

    /// True when some key maps to `master_service`
    pub fn maps_to(&self, master_service: &str) -> bool {
        self.reverse(master_service).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for ServiceMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ServiceMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = ServiceMapping;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of entity service names to master service names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut mapping = ServiceMapping::new();
                // Document order is the insertion order
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    mapping.insert(k, v);
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

/// The persisted mapping document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDocument {
    #[serde(default = "default_master_entity")]
    pub master_entity: String,

    #[serde(default)]
    pub mappings: BTreeMap<String, ServiceMapping>,
}

fn default_master_entity() -> String {
    DEFAULT_MASTER_ENTITY.to_string()
}

impl Default for MappingDocument {
    fn default() -> Self {
        Self {
            master_entity: default_master_entity(),
            mappings: BTreeMap::new(),
        }
    }
}

impl MappingDocument {
    pub fn is_master(&self, entity: &str) -> bool {
        entity == self.master_entity
    }

    /// The table of an entity, if one exists
    pub fn table(&self, entity: &str) -> Option<&ServiceMapping> {
        self.mappings.get(entity)
    }

    /// Master service names in catalog order
    pub fn master_services(&self, catalog: &Catalog) -> Vec<String> {
        catalog.service_names(&self.master_entity)
    }

    /// Master name for an entity service; identity for the master entity
    pub fn get_mapping(&self, entity: &str, entity_service: &str) -> Option<String> {
        if self.is_master(entity) {
            return Some(entity_service.to_string());
        }
        self.table(entity)
            .and_then(|t| t.get(entity_service))
            .map(str::to_string)
    }

    /// Upsert one entry; returns the previous master name
    pub fn set_mapping(
        &mut self,
        entity: &str,
        entity_service: &str,
        master_service: &str,
    ) -> Option<String> {
        self.mappings
            .entry(entity.to_string())
            .or_default()
            .insert(entity_service.to_string(), master_service.to_string())
    }

    /// Delete one entry if present
    pub fn remove_mapping(&mut self, entity: &str, entity_service: &str) -> Option<String> {
        self.mappings
            .get_mut(entity)
            .and_then(|t| t.remove(entity_service))
    }

    /// First entity service mapped to a master name; identity for the master entity
    pub fn get_reverse_mapping(&self, entity: &str, master_service: &str) -> Option<String> {
        if self.is_master(entity) {
            return Some(master_service.to_string());
        }
        self.table(entity)
            .and_then(|t| t.reverse(master_service))
            .map(str::to_string)
    }

    /// Translate through the master vocabulary; none if either hop is unmapped
    pub fn translate_service(&self, from: &str, to: &str, name: &str) -> Option<String> {
        let master = self.get_mapping(from, name)?;
        self.get_reverse_mapping(to, &master)
    }

    /// Master services that no key of the entity's table maps to
    pub fn sync_entity_to_master(&self, entity: &str, catalog: &Catalog) -> Vec<String> {
        if self.is_master(entity) {
            return Vec::new();
        }
        let mapped: HashSet<&str> = self
            .table(entity)
            .map(|t| t.iter().map(|(_, v)| v).collect())
            .unwrap_or_default();
        self.master_services(catalog)
            .into_iter()
            .filter(|s| !mapped.contains(s.as_str()))
            .collect()
    }

    /// Entity services with no table entry
    pub fn get_unmapped_services(&self, entity: &str, catalog: &Catalog) -> Vec<String> {
        if self.is_master(entity) {
            return Vec::new();
        }
        let table = self.table(entity);
        catalog
            .service_names(entity)
            .into_iter()
            .filter(|s| !table.map_or(false, |t| t.contains_key(s)))
            .collect()
    }

    /// Seed by position: the entity's Nth service maps to the master's Nth service
    ///
    /// Services beyond the master's count stay unmapped. Returns the seeded
    /// pairs `(entity_service, master_service)`. The master entity is
    /// self-mapped and never seeded.
    pub fn seed_by_position(&mut self, entity: &str, catalog: &Catalog) -> Vec<(String, String)> {
        if self.is_master(entity) {
            return Vec::new();
        }
        let master = self.master_services(catalog);
        let pairs: Vec<(String, String)> = catalog
            .service_names(entity)
            .into_iter()
            .zip(master)
            .collect();

        let table = self.mappings.entry(entity.to_string()).or_default();
        for (entity_service, master_service) in &pairs {
            table.insert(entity_service.clone(), master_service.clone());
        }
        pairs
    }

    /// Identity-map a new master service into every non-master entity lacking it
    ///
    /// Returns the entities that received a mapping.
    pub fn add_master_service_to_all(&mut self, new_service: &str, catalog: &Catalog) -> Vec<String> {
        let mut updated = Vec::new();
        for entity in catalog.entity_names() {
            if self.is_master(&entity) {
                continue;
            }
            let has_mapping = self
                .table(&entity)
                .map_or(false, |t| t.maps_to(new_service));
            if !has_mapping {
                self.set_mapping(&entity, new_service, new_service);
                updated.push(entity);
            }
        }
        updated
    }
}
