//! Per-account service configuration
//!
//! For Word services the configuration names which input fields feed the
//! quantity. For Hour services it carries the dividers turning word counts
//! into hours. Numbers may be stored as JSON numbers or as strings.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::inputs::{FileType, InputMode};

pub const DEFAULT_MIN_HOURLY_RATE: f64 = 0.5;
pub const DEFAULT_INCREMENT_RATE: f64 = 0.25;
pub const DEFAULT_PM_PERCENT: f64 = 10.0;
pub const DEFAULT_DIVIDER: f64 = 1.0;

/// Accept a number, a numeric string, an empty string or null
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Number(n)) if n.is_finite() => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// Divider pair for one input mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dividers {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub live_divider: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub dead_divider: Option<f64>,
}

impl Dividers {
    /// Divider for a file type; missing means 1
    pub fn for_file_type(&self, file_type: FileType) -> f64 {
        let value = match file_type {
            FileType::Live => self.live_divider,
            FileType::Dead => self.dead_divider,
        };
        value.unwrap_or(DEFAULT_DIVIDER)
    }
}

/// QTC settings of an hourly service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QtcHourly {
    #[serde(flatten)]
    pub dividers: Dividers,

    #[serde(default)]
    pub use_wc_for_translation: bool,

    #[serde(default)]
    pub use_wc_for_revision: bool,
}

/// Hour service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySettings {
    #[serde(rename = "QuoteMe", default)]
    pub quote_me: Dividers,

    #[serde(rename = "QTC", default)]
    pub qtc: QtcHourly,
}

/// Word service configuration: labels of the input fields summed into the quantity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordLabels {
    #[serde(rename = "QuoteMe", default)]
    pub quote_me: Vec<String>,

    #[serde(rename = "QTC", default)]
    pub qtc: Vec<String>,
}

impl WordLabels {
    pub fn for_mode(&self, mode: InputMode) -> &[String] {
        match mode {
            InputMode::QuoteMe => &self.quote_me,
            InputMode::Qtc => &self.qtc,
        }
    }
}

/// Settings of one service; the JSON shape tells which kind it is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceSettings {
    Word(WordLabels),
    Hourly(HourlySettings),
}

/// Configuration of one account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub min_hourly_rate: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub increment_rate: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub default_pm_percent: Option<f64>,

    /// Everything else is keyed by service name
    #[serde(flatten)]
    pub services: BTreeMap<String, ServiceSettings>,
}

impl AccountConfig {
    /// Hourly floor; 0.5 when unset
    pub fn min_hourly_rate(&self) -> f64 {
        self.min_hourly_rate.unwrap_or(DEFAULT_MIN_HOURLY_RATE)
    }

    /// Rounding increment; 0.25 when unset or not positive
    pub fn increment_rate(&self) -> f64 {
        self.increment_rate
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_INCREMENT_RATE)
    }

    /// Project Management percentage; 10 when unset
    pub fn default_pm_percent(&self) -> f64 {
        self.default_pm_percent.unwrap_or(DEFAULT_PM_PERCENT)
    }

    /// Labels feeding a Word service in the given mode; empty when unconfigured
    pub fn word_labels(&self, service: &str, mode: InputMode) -> &[String] {
        match self.services.get(service) {
            Some(ServiceSettings::Word(labels)) => labels.for_mode(mode),
            _ => &[],
        }
    }

    /// Hourly settings of a service, if configured as such
    pub fn hourly(&self, service: &str) -> Option<&HourlySettings> {
        match self.services.get(service) {
            Some(ServiceSettings::Hourly(settings)) => Some(settings),
            _ => None,
        }
    }

    pub fn set_service(&mut self, service: impl Into<String>, settings: ServiceSettings) {
        self.services.insert(service.into(), settings);
    }
}

/// The persisted configuration document, keyed by account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceConfigDocument {
    pub accounts: BTreeMap<String, AccountConfig>,
}

impl ServiceConfigDocument {
    /// Configuration of an account; an unknown account gets every default
    pub fn account(&self, account: &str) -> AccountConfig {
        self.accounts.get(account).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORED: &str = r#"{
        "min_hourly_rate": "0.75",
        "increment_rate": "",
        "Translation": {"QuoteMe": ["New Words:"], "QTC": ["TC WC for TRANSLATION:"]},
        "Formatting": {
            "QuoteMe": {"live_divider": "1000", "dead_divider": 500},
            "QTC": {"live_divider": "", "dead_divider": "0", "use_wc_for_revision": true}
        }
    }"#;

    #[test]
    fn test_parse_stored_strings() {
        let config: AccountConfig = serde_json::from_str(STORED).unwrap();

        assert_eq!(config.min_hourly_rate(), 0.75);
        assert_eq!(config.increment_rate(), DEFAULT_INCREMENT_RATE);
        assert_eq!(config.default_pm_percent(), DEFAULT_PM_PERCENT);

        assert_eq!(config.word_labels("Translation", InputMode::QuoteMe), ["New Words:"]);
        assert!(config.word_labels("Formatting", InputMode::QuoteMe).is_empty());

        let formatting = config.hourly("Formatting").unwrap();
        assert_eq!(formatting.quote_me.for_file_type(FileType::Live), 1000.0);
        assert_eq!(formatting.quote_me.for_file_type(FileType::Dead), 500.0);
        assert_eq!(formatting.qtc.dividers.for_file_type(FileType::Live), DEFAULT_DIVIDER);
        assert_eq!(formatting.qtc.dividers.for_file_type(FileType::Dead), 0.0);
        assert!(formatting.qtc.use_wc_for_revision);
        assert!(!formatting.qtc.use_wc_for_translation);
    }

    #[test]
    fn test_non_numeric_values_fall_back_to_defaults() {
        let config: AccountConfig = serde_json::from_str(
            r#"{"min_hourly_rate": true, "increment_rate": [1], "default_pm_percent": null}"#,
        )
        .unwrap();
        assert_eq!(config.min_hourly_rate(), DEFAULT_MIN_HOURLY_RATE);
        assert_eq!(config.increment_rate(), DEFAULT_INCREMENT_RATE);
        assert_eq!(config.default_pm_percent(), DEFAULT_PM_PERCENT);
    }

    #[test]
    fn test_unknown_account_uses_defaults() {
        let doc = ServiceConfigDocument::default();
        let config = doc.account("Acme");
        assert_eq!(config.min_hourly_rate(), 0.5);
        assert_eq!(config.increment_rate(), 0.25);
        assert!(config.hourly("Formatting").is_none());
    }

    #[test]
    fn test_non_positive_increment_falls_back() {
        let config = AccountConfig {
            increment_rate: Some(0.0),
            ..Default::default()
        };
        assert_eq!(config.increment_rate(), 0.25);
    }
}
