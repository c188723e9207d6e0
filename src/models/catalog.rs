//! Service catalog model
//!
//! The catalog is an ordered list of entities, each owning an ordered list
//! of services. Order matters: position seeding of mapping tables pairs
//! services by catalog index.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::service::Service;

/// A business unit with its own service vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,

    #[serde(default)]
    pub services: Vec<Service>,
}

impl Entity {
    /// Create an entity with no services
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            services: Vec::new(),
        }
    }

    /// Service names in catalog order
    pub fn service_names(&self) -> Vec<String> {
        self.services.iter().map(|s| s.name.clone()).collect()
    }

    /// First service with exactly this name
    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Check whether a service name exists in this entity
    pub fn has_service(&self, name: &str) -> bool {
        self.find_service(name).is_some()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} services)", self.name, self.services.len())
    }
}

/// Registry of services per entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Catalog {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// Build a catalog from legacy tabular rows
    ///
    /// Each entity maps to rows of `[group1, group2, service, uom]`. The
    /// first row is a header and is skipped, as are rows without a service
    /// name.
    pub fn from_tabular(tables: Vec<(String, Vec<Vec<String>>)>) -> Self {
        let entities = tables
            .into_iter()
            .map(|(name, rows)| Entity {
                name,
                services: rows.iter().skip(1).filter_map(|r| Service::from_row(r)).collect(),
            })
            .collect();
        Self { entities }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    /// Case-insensitive lookup, used for duplicate checks
    pub fn entity_ignore_case(&self, name: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn entity_names(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.name.clone()).collect()
    }

    /// Service names of an entity in catalog order; empty for unknown entities
    pub fn service_names(&self, entity: &str) -> Vec<String> {
        self.entity(entity)
            .map(Entity::service_names)
            .unwrap_or_default()
    }

    /// Linear scan of an entity's services by exact name; first hit wins
    pub fn find_service(&self, entity: &str, name: &str) -> Option<&Service> {
        self.entity(entity).and_then(|e| e.find_service(name))
    }

    /// Append an entity; returns false if the name is already taken
    pub fn add_entity(&mut self, entity: Entity) -> bool {
        if self.entity_ignore_case(&entity.name).is_some() {
            return false;
        }
        self.entities.push(entity);
        true
    }

    /// Remove an entity by name, returning it
    pub fn remove_entity(&mut self, name: &str) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.name == name)?;
        Some(self.entities.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitOfMeasure;

    fn row(values: [&str; 4]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_from_tabular_skips_header_and_blank_rows() {
        let rows = vec![
            row(["Service Group 1", "Service Group 2", "Service", "Default UofM"]),
            row(["Language Services", "Translation", "Translation", "Word"]),
            row(["", "", "", ""]),
            row(["Handling & Delivery", "", "Courrier", "Fee"]),
        ];
        let catalog = Catalog::from_tabular(vec![("TPUS".into(), rows)]);

        assert_eq!(catalog.service_names("TPUS"), vec!["Translation", "Courrier"]);
        let courier = catalog.find_service("TPUS", "Courrier").unwrap();
        assert_eq!(courier.default_unit_of_measure, UnitOfMeasure::Fee);
    }

    #[test]
    fn test_unknown_entity_has_no_services() {
        let catalog = Catalog::default();
        assert!(catalog.service_names("TPTXX").is_empty());
        assert!(catalog.find_service("TPTXX", "Translation").is_none());
    }

    #[test]
    fn test_add_entity_rejects_case_insensitive_duplicate() {
        let mut catalog = Catalog::new(vec![Entity::new("TPUS")]);
        assert!(!catalog.add_entity(Entity::new("tpus")));
        assert!(catalog.add_entity(Entity::new("TPTDE")));
        assert_eq!(catalog.entity_names(), vec!["TPUS", "TPTDE"]);

        assert!(catalog.remove_entity("TPTDE").is_some());
        assert!(catalog.remove_entity("TPTDE").is_none());
    }
}
