//! Service model
//!
//! A catalog service belongs to exactly one entity. Each carries a unit of
//! measure that drives the calculation dispatch and a role that marks the
//! few services the engine treats specially.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Billing unit for a service
///
/// Labels other than the well-known ones are preserved verbatim so that a
/// catalog round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitOfMeasure {
    Word,
    Hour,
    Fee,
    /// Set on rows replaced by the minimum-fee correction
    Minimum,
    Other(String),
}

impl UnitOfMeasure {
    /// Parse a unit label
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Word" => Self::Word,
            "Hour" => Self::Hour,
            "Fee" => Self::Fee,
            "Minimum" => Self::Minimum,
            other => Self::Other(other.to_string()),
        }
    }

    /// The label as written in catalogs and exports
    pub fn as_str(&self) -> &str {
        match self {
            Self::Word => "Word",
            Self::Hour => "Hour",
            Self::Fee => "Fee",
            Self::Minimum => "Minimum",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for UnitOfMeasure {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<UnitOfMeasure> for String {
    fn from(unit: UnitOfMeasure) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Calculation family of a service, derived from its unit of measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Quantity from word counts, rate per language pair
    Word,
    /// Quantity in rounded hours, one language-independent rate
    Hour,
    /// Fees and percentage surcharges (covers every other label)
    Percentage,
}

impl ServiceKind {
    /// Dispatch on the unit of measure: Word, Hour, everything else
    pub fn classify(unit: &UnitOfMeasure) -> Self {
        match unit {
            UnitOfMeasure::Word => Self::Word,
            UnitOfMeasure::Hour => Self::Hour,
            _ => Self::Percentage,
        }
    }
}

/// Capability tag the calculation engine dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRole {
    #[default]
    Standard,
    /// Primary human translation; forced to the minimum fee when under the floor
    Translation,
    /// Primary machine translation; same floor handling as Translation
    MachineTranslation,
    /// Floored on its own, excluded from the word-service floor
    BackTranslation,
    /// Percentage of every row above it
    ProjectManagementFee,
    /// Percentage of every row above it, including Project Management
    RushPremiumFee,
}

impl ServiceRole {
    /// Infer a role from a well-known service name
    ///
    /// Used only when a catalog entry carries no explicit role.
    pub fn from_service_name(name: &str) -> Self {
        match name.trim() {
            "Translation" => Self::Translation,
            "Machine Translation" => Self::MachineTranslation,
            "Back Translation" => Self::BackTranslation,
            "Project Management" => Self::ProjectManagementFee,
            "Rush Premium" => Self::RushPremiumFee,
            _ => Self::Standard,
        }
    }

    /// Translation or Machine Translation
    pub fn is_primary_translation(self) -> bool {
        matches!(self, Self::Translation | Self::MachineTranslation)
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Standard => "standard",
            Self::Translation => "translation",
            Self::MachineTranslation => "machine translation",
            Self::BackTranslation => "back translation",
            Self::ProjectManagementFee => "project management fee",
            Self::RushPremiumFee => "rush premium fee",
        };
        write!(f, "{}", label)
    }
}

/// A service offered by one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub service_group_1: String,

    pub service_group_2: String,

    /// Unique within the owning entity
    pub name: String,

    pub default_unit_of_measure: UnitOfMeasure,

    /// Explicit role; inferred from the name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ServiceRole>,
}

impl Service {
    /// Create a service without an explicit role
    pub fn new(
        service_group_1: impl Into<String>,
        service_group_2: impl Into<String>,
        name: impl Into<String>,
        unit: UnitOfMeasure,
    ) -> Self {
        Self {
            service_group_1: service_group_1.into(),
            service_group_2: service_group_2.into(),
            name: name.into(),
            default_unit_of_measure: unit,
            role: None,
        }
    }

    /// Attach an explicit role
    pub fn with_role(mut self, role: ServiceRole) -> Self {
        self.role = Some(role);
        self
    }

    /// The effective role
    pub fn role(&self) -> ServiceRole {
        self.role
            .unwrap_or_else(|| ServiceRole::from_service_name(&self.name))
    }

    /// The calculation family
    pub fn kind(&self) -> ServiceKind {
        ServiceKind::classify(&self.default_unit_of_measure)
    }

    /// Build a service from a legacy catalog row `[group1, group2, name, uom]`
    ///
    /// Returns `None` for short rows and rows without a service name.
    pub fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < 4 || row[2].trim().is_empty() {
            return None;
        }
        Some(Self::new(
            row[0].trim(),
            row[1].trim(),
            row[2].trim(),
            UnitOfMeasure::parse(&row[3]),
        ))
    }

    /// Validate the service
    pub fn validate(&self) -> Result<(), ServiceValidationError> {
        if self.name.trim().is_empty() {
            return Err(ServiceValidationError::EmptyName);
        }
        if self.default_unit_of_measure.as_str().trim().is_empty() {
            return Err(ServiceValidationError::EmptyUnit(self.name.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.default_unit_of_measure)
    }
}

/// Validation errors for services
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceValidationError {
    EmptyName,
    EmptyUnit(String),
}

impl fmt::Display for ServiceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Service name cannot be empty"),
            Self::EmptyUnit(name) => write!(f, "Service '{}' has no unit of measure", name),
        }
    }
}

impl std::error::Error for ServiceValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(ServiceKind::classify(&UnitOfMeasure::Word), ServiceKind::Word);
        assert_eq!(ServiceKind::classify(&UnitOfMeasure::Hour), ServiceKind::Hour);
        assert_eq!(ServiceKind::classify(&UnitOfMeasure::Fee), ServiceKind::Percentage);
        assert_eq!(
            ServiceKind::classify(&UnitOfMeasure::parse("test Uofm")),
            ServiceKind::Percentage
        );
    }

    #[test]
    fn test_unit_serde_preserves_unknown_labels() {
        let unit: UnitOfMeasure = serde_json::from_str("\"Page\"").unwrap();
        assert_eq!(unit, UnitOfMeasure::Other("Page".into()));
        assert_eq!(serde_json::to_string(&unit).unwrap(), "\"Page\"");

        let word: UnitOfMeasure = serde_json::from_str("\"Word\"").unwrap();
        assert_eq!(word, UnitOfMeasure::Word);
    }

    #[test]
    fn test_role_inferred_from_name() {
        let bt = Service::new("Language Services", "Translation", "Back Translation", UnitOfMeasure::Word);
        assert_eq!(bt.role(), ServiceRole::BackTranslation);

        let custom = Service::new("Language Services", "Translation", "Übersetzung", UnitOfMeasure::Word)
            .with_role(ServiceRole::Translation);
        assert_eq!(custom.role(), ServiceRole::Translation);
        assert!(custom.role().is_primary_translation());
    }

    #[test]
    fn test_role_omitted_when_not_set() {
        let svc = Service::new("Handling & Delivery", "", "Courrier", UnitOfMeasure::Fee);
        let json = serde_json::to_string(&svc).unwrap();
        assert!(!json.contains("role"));
    }

    #[test]
    fn test_from_row() {
        let row: Vec<String> = ["Language Services", "Translation", "Review", "Hour"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let svc = Service::from_row(&row).unwrap();
        assert_eq!(svc.name, "Review");
        assert_eq!(svc.kind(), ServiceKind::Hour);

        let blank: Vec<String> = vec![String::new(); 4];
        assert!(Service::from_row(&blank).is_none());
    }

    #[test]
    fn test_validate() {
        let svc = Service::new("", "", "  ", UnitOfMeasure::Word);
        assert_eq!(svc.validate(), Err(ServiceValidationError::EmptyName));
    }
}
