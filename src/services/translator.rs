//! Workflow translator
//!
//! Turns a list of master service names into the equivalent list for
//! another entity. Translation never blocks: a service without a mapping
//! keeps its master name and carries a warning.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Catalog, MappingDocument, Service};

/// Outcome of translating one master service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub master_service: String,
    /// The entity's name for the service, or the master name when unmapped
    pub entity_service: String,
    pub entity: String,
    pub mapped: bool,
    pub service_data: Option<Service>,
    pub warning: Option<String>,
}

/// Pure translator over a catalog and a mapping document
pub struct WorkflowTranslator<'a> {
    catalog: &'a Catalog,
    mappings: &'a MappingDocument,
}

impl<'a> WorkflowTranslator<'a> {
    pub fn new(catalog: &'a Catalog, mappings: &'a MappingDocument) -> Self {
        Self { catalog, mappings }
    }

    pub fn master_entity(&self) -> &str {
        &self.mappings.master_entity
    }

    /// Translate master services into `target_entity`, one result per input
    pub fn translate_workflow<S: AsRef<str>>(
        &self,
        master_services: &[S],
        target_entity: &str,
        include_full_data: bool,
    ) -> Vec<TranslationResult> {
        let is_master = self.mappings.is_master(target_entity);
        master_services
            .iter()
            .map(|name| {
                let master_service = name.as_ref();
                let entity_service = if is_master {
                    Some(master_service.to_string())
                } else {
                    self.mappings.get_reverse_mapping(target_entity, master_service)
                };

                match entity_service {
                    Some(entity_service) => TranslationResult {
                        service_data: include_full_data
                            .then(|| self.find_service_in_entity(&entity_service, target_entity))
                            .flatten()
                            .cloned(),
                        master_service: master_service.to_string(),
                        entity_service,
                        entity: target_entity.to_string(),
                        mapped: true,
                        warning: None,
                    },
                    None => TranslationResult {
                        master_service: master_service.to_string(),
                        entity_service: master_service.to_string(),
                        entity: target_entity.to_string(),
                        mapped: false,
                        service_data: None,
                        warning: Some(format!(
                            "No mapping found for '{}' in {}",
                            master_service, target_entity
                        )),
                    },
                }
            })
            .collect()
    }

    /// First service of the entity with exactly this name
    pub fn find_service_in_entity(&self, name: &str, entity: &str) -> Option<&'a Service> {
        self.catalog.find_service(entity, name)
    }

    pub fn batch_translate<S: AsRef<str>, E: AsRef<str>>(
        &self,
        master_services: &[S],
        target_entities: &[E],
    ) -> BTreeMap<String, Vec<TranslationResult>> {
        target_entities
            .iter()
            .map(|entity| {
                let entity = entity.as_ref();
                (
                    entity.to_string(),
                    self.translate_workflow(master_services, entity, true),
                )
            })
            .collect()
    }

    /// Whether every service translates, and the ones that do not
    pub fn validate_workflow<S: AsRef<str>>(
        &self,
        master_services: &[S],
        target_entity: &str,
    ) -> (bool, Vec<String>) {
        if self.mappings.is_master(target_entity) {
            return (true, Vec::new());
        }
        let unmapped: Vec<String> = master_services
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| {
                self.mappings
                    .get_reverse_mapping(target_entity, name)
                    .is_none()
            })
            .map(str::to_string)
            .collect();
        (unmapped.is_empty(), unmapped)
    }

    /// Re-translate existing results into another entity
    ///
    /// The master name carried by each result is preferred; a result without
    /// one is mapped back through `from_entity` and dropped if that fails.
    pub fn switch_entity_context(
        &self,
        current: &[TranslationResult],
        from_entity: &str,
        to_entity: &str,
    ) -> Vec<TranslationResult> {
        let master_services: Vec<String> = current
            .iter()
            .filter_map(|r| {
                if r.master_service.is_empty() {
                    self.mappings.get_mapping(from_entity, &r.entity_service)
                } else {
                    Some(r.master_service.clone())
                }
            })
            .collect();
        self.translate_workflow(&master_services, to_entity, true)
    }

    /// Translate plain entity service names from one entity to another
    ///
    /// A name without a mapping in `from_entity` is taken as a master name.
    pub fn switch_services<S: AsRef<str>>(
        &self,
        names: &[S],
        from_entity: &str,
        to_entity: &str,
    ) -> Vec<TranslationResult> {
        let master_services: Vec<String> = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.mappings
                    .get_mapping(from_entity, name)
                    .unwrap_or_else(|| name.to_string())
            })
            .collect();
        self.translate_workflow(&master_services, to_entity, true)
    }

    /// Human-readable summary of translating a workflow
    pub fn get_workflow_summary<S: AsRef<str>>(
        &self,
        master_services: &[S],
        target_entity: &str,
    ) -> String {
        let results = self.translate_workflow(master_services, target_entity, true);
        crate::display::format_translation_summary(
            self.master_entity(),
            target_entity,
            &results,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::init::default_catalog;

    fn seeded() -> (Catalog, MappingDocument) {
        let catalog = default_catalog();
        let mut doc = MappingDocument::default();
        for entity in catalog.entity_names() {
            doc.seed_by_position(&entity, &catalog);
        }
        (catalog, doc)
    }

    #[test]
    fn test_unmapped_translation_never_fails() {
        let (catalog, doc) = seeded();
        let translator = WorkflowTranslator::new(&catalog, &doc);

        let results = translator.translate_workflow(&["Nonexistent Service"], "TPTDE", true);
        assert_eq!(results.len(), 1);
        assert!(!results[0].mapped);
        assert!(results[0].warning.is_some());
        assert_eq!(results[0].entity_service, "Nonexistent Service");
    }

    #[test]
    fn test_master_is_trivially_mapped() {
        let (catalog, doc) = seeded();
        let translator = WorkflowTranslator::new(&catalog, &doc);

        let results = translator.translate_workflow(&["Formatting", "Made Up"], "TPUS", true);
        assert!(results.iter().all(|r| r.mapped));
        assert!(results[0].service_data.is_some());
        assert!(results[1].service_data.is_none());
        assert_eq!(translator.validate_workflow(&["Made Up"], "TPUS"), (true, vec![]));
    }

    #[test]
    fn test_translate_with_renamed_service() {
        let (catalog, doc) = seeded();
        let translator = WorkflowTranslator::new(&catalog, &doc);

        let results = translator.translate_workflow(&["Review", "Formatting"], "TPTFR", false);
        assert_eq!(results[1].entity_service, "Mise en page");
        assert!(results.iter().all(|r| r.service_data.is_none()));

        let with_data = translator.translate_workflow(&["Formatting"], "TPTFR", true);
        let data = with_data[0].service_data.as_ref().unwrap();
        assert_eq!(data.service_group_1, "Desktop Publishing");
    }

    #[test]
    fn test_switch_context_round_trips() {
        let (catalog, doc) = seeded();
        let translator = WorkflowTranslator::new(&catalog, &doc);
        let workflow = ["Translation", "Formatting", "Project Management"];

        let fr = translator.translate_workflow(&workflow, "TPTFR", true);
        let de = translator.switch_entity_context(&fr, "TPTFR", "TPTDE");
        let back = translator.switch_entity_context(&de, "TPTDE", "TPTFR");
        let names: Vec<&str> = back.iter().map(|r| r.entity_service.as_str()).collect();
        assert_eq!(names, vec!["Translation", "Mise en page", "Project Management"]);
    }

    #[test]
    fn test_switch_context_without_master_name() {
        let (catalog, doc) = seeded();
        let translator = WorkflowTranslator::new(&catalog, &doc);
        let entity_only = |entity_service: &str| TranslationResult {
            master_service: String::new(),
            entity_service: entity_service.to_string(),
            entity: "TPTFR".to_string(),
            mapped: true,
            service_data: None,
            warning: None,
        };

        let current = vec![entity_only("Mise en page"), entity_only("Pas de service")];
        let switched = translator.switch_entity_context(&current, "TPTFR", "TPTDE");
        assert_eq!(switched.len(), 1);
        assert_eq!(switched[0].master_service, "Formatting");
        assert_eq!(switched[0].entity_service, "Formatting");
        assert!(switched[0].mapped);
    }

    #[test]
    fn test_switch_services_from_entity_names() {
        let (catalog, mut doc) = seeded();
        doc.set_mapping("TPTDE", "Übersetzung", "Translation");
        doc.remove_mapping("TPTDE", "Translation");
        let translator = WorkflowTranslator::new(&catalog, &doc);

        let results = translator.switch_services(&["Übersetzung", "Unknown"], "TPTDE", "TPTFR");
        assert_eq!(results[0].master_service, "Translation");
        assert_eq!(results[0].entity_service, "Translation");
        assert_eq!(results[1].master_service, "Unknown");
        assert!(!results[1].mapped);
    }

    #[test]
    fn test_batch_and_validate() {
        let (catalog, mut doc) = seeded();
        doc.remove_mapping("TPTIT", "Review");
        let translator = WorkflowTranslator::new(&catalog, &doc);

        let batch = translator.batch_translate(&["Review"], &["TPTDE", "TPTIT"]);
        assert!(batch["TPTDE"][0].mapped);
        assert!(!batch["TPTIT"][0].mapped);

        let (valid, unmapped) = translator.validate_workflow(&["Translation", "Review"], "TPTIT");
        assert!(!valid);
        assert_eq!(unmapped, vec!["Review"]);
    }

    #[test]
    fn test_summary_flags_unmapped() {
        let (catalog, doc) = seeded();
        let translator = WorkflowTranslator::new(&catalog, &doc);
        let summary = translator.get_workflow_summary(&["Formatting", "Ghost"], "TPTFR");
        assert!(summary.contains("Formatting -> Mise en page"));
        assert!(summary.contains("UNMAPPED"));
    }
}
