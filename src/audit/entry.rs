//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Mapping entries generated by position rather than entered by a user
    Seed,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Seed => write!(f, "SEED"),
        }
    }
}

/// Kinds of records that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A business unit of the catalog
    Entity,
    /// A catalog service
    Service,
    /// A mapping table entry or a whole table
    ServiceMapping,
    Account,
    Workflow,
    ServiceConfig,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Entity => write!(f, "Entity"),
            EntityType::Service => write!(f, "Service"),
            EntityType::ServiceMapping => write!(f, "ServiceMapping"),
            EntityType::Account => write!(f, "Account"),
            EntityType::Workflow => write!(f, "Workflow"),
            EntityType::ServiceConfig => write!(f, "ServiceConfig"),
        }
    }
}

/// A single audit log entry
///
/// `entity_id` is a path-like key such as `TPTDE/Übersetzung` or
/// `Acme/Standard`, since records here are identified by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            after: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Create, entity_type, entity_id)
        }
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::new(Operation::Update, entity_type, entity_id)
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Delete, entity_type, entity_id)
        }
    }

    /// Record the pairs produced by a position seed
    pub fn seed(entity: &str, pairs: &[(String, String)]) -> Self {
        let summary = pairs
            .iter()
            .map(|(entity_service, master)| format!("{} -> {}", entity_service, master))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            entity_name: Some(entity.to_string()),
            after: serde_json::to_value(pairs).ok(),
            diff_summary: (!summary.is_empty()).then_some(summary),
            ..Self::new(Operation::Seed, EntityType::ServiceMapping, entity)
        }
    }

    /// One line per entry, plus the change summary when there is one
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_entry() {
        let entry = AuditEntry::update(
            EntityType::ServiceMapping,
            "TPTDE/Übersetzung",
            None,
            &json!("Translation"),
            &json!("Review"),
            Some("Translation -> Review".to_string()),
        );

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.before, Some(json!("Translation")));
        assert_eq!(entry.after, Some(json!("Review")));
    }

    #[test]
    fn test_seed_entry_lists_pairs() {
        let pairs = vec![
            ("Übersetzung".to_string(), "Translation".to_string()),
            ("Korrektur".to_string(), "Proofreading".to_string()),
        ];
        let entry = AuditEntry::seed("TPTDE", &pairs);

        assert_eq!(entry.operation, Operation::Seed);
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("Übersetzung -> Translation, Korrektur -> Proofreading")
        );
        let formatted = entry.format_human_readable();
        assert!(formatted.contains("SEED ServiceMapping TPTDE"));
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::delete(EntityType::Workflow, "Acme/Standard", None, &json!(["Translation"]));
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"entity_type\":\"workflow\""));

        let back: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back.operation, Operation::Delete);
        assert!(back.after.is_none());
    }
}
