//! Entity and mapping display formatting

use crate::models::{Entity, ServiceMapping};
use crate::services::SyncStatus;

/// Format entities as a table
pub fn format_entity_list(entities: &[Entity], master_entity: &str) -> String {
    if entities.is_empty() {
        return "No entities found.".to_string();
    }

    let name_width = entities.iter().map(|e| e.name.len()).max().unwrap_or(6).max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>8}  {}\n",
        "Entity",
        "Services",
        "Role",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->8}  {:-<6}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));
    for entity in entities {
        output.push_str(&format!(
            "{:<name_width$}  {:>8}  {}\n",
            entity.name,
            entity.services.len(),
            if entity.name == master_entity { "master" } else { "" },
            name_width = name_width,
        ));
    }
    output
}

/// Format an entity's services with their mapping to the master
pub fn format_entity_details(entity: &Entity, mapping: Option<&ServiceMapping>) -> String {
    let mut output = format!("Entity: {}\n", entity.name);
    if entity.services.is_empty() {
        output.push_str("  (no services)\n");
        return output;
    }

    let name_width = entity
        .services
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(7)
        .max(7);

    for (i, service) in entity.services.iter().enumerate() {
        let mapped = match mapping {
            None => String::new(),
            Some(table) => match table.get(&service.name) {
                Some(master) => format!("-> {}", master),
                None => "(unmapped)".to_string(),
            },
        };
        output.push_str(&format!(
            "{:>3}. {:<name_width$}  {:<6}  {}\n",
            i + 1,
            service.name,
            service.default_unit_of_measure.to_string(),
            mapped,
            name_width = name_width,
        ));
    }
    output
}

/// Format a mapping table in insertion order
pub fn format_mapping_table(entity: &str, table: &ServiceMapping) -> String {
    if table.is_empty() {
        return format!("No mappings for {}.", entity);
    }

    let width = table.iter().map(|(k, _)| k.len()).max().unwrap_or(14).max(14);
    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {}\n",
        format!("{} service", entity),
        "Master service",
        width = width,
    ));
    output.push_str(&format!("{:-<width$}  {:-<14}\n", "", "", width = width));
    for (entity_service, master_service) in table.iter() {
        output.push_str(&format!(
            "{:<width$}  {}\n",
            entity_service,
            master_service,
            width = width,
        ));
    }
    output
}

pub fn format_sync_status(statuses: &[SyncStatus]) -> String {
    let mut output = String::new();
    for status in statuses {
        if status.in_sync() {
            output.push_str(&format!(
                "{}: in sync ({} services)\n",
                status.entity, status.service_count
            ));
        } else {
            output.push_str(&format!(
                "{}: missing {} ({})\n",
                status.entity,
                status.missing.len(),
                status.missing.join(", ")
            ));
        }
    }
    output
}
