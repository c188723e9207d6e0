//! User settings for quotedesk
//!
//! Quote defaults applied when a command line or caller leaves a value out.

use serde::{Deserialize, Serialize};

use super::paths::QuotePaths;
use crate::error::QuoteError;
use crate::export::ExportFormat;
use crate::models::{FileType, InputMode};

/// User settings for quotedesk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Minimum fee applied per language pair when none is given
    #[serde(default)]
    pub default_min_fee: f64,

    /// Rush Premium percentage when none is given
    #[serde(default = "default_rush_percent")]
    pub default_rush_percent: f64,

    /// File type used for hourly dividers when none is given
    #[serde(default)]
    pub default_file_type: FileType,

    /// Word-count input mode when none is given
    #[serde(default)]
    pub default_input_mode: InputMode,

    /// Format used by `quote --output` when no format is given
    #[serde(default)]
    pub export_format: ExportFormat,
}

fn default_schema_version() -> u32 {
    1
}

fn default_rush_percent() -> f64 {
    25.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_min_fee: 0.0,
            default_rush_percent: default_rush_percent(),
            default_file_type: FileType::default(),
            default_input_mode: InputMode::default(),
            export_format: ExportFormat::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &QuotePaths) -> Result<Self, QuoteError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| QuoteError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                QuoteError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &QuotePaths) -> Result<(), QuoteError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| QuoteError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| QuoteError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_min_fee, 0.0);
        assert_eq!(settings.default_rush_percent, 25.0);
        assert_eq!(settings.default_file_type, FileType::Live);
        assert_eq!(settings.default_input_mode, InputMode::QuoteMe);
        assert_eq!(settings.export_format, ExportFormat::Csv);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuotePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            default_min_fee: 150.0,
            default_file_type: FileType::Dead,
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_min_fee, 150.0);
        assert_eq!(loaded.default_file_type, FileType::Dead);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"default_min_fee": 75.0}"#).unwrap();
        assert_eq!(loaded.default_min_fee, 75.0);
        assert_eq!(loaded.default_rush_percent, 25.0);
        assert_eq!(loaded.schema_version, 1);
    }
}
