//! Path management for quotedesk
//!
//! ## Path Resolution Order
//!
//! 1. `QUOTEDESK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/quotedesk` or `~/.config/quotedesk`
//! 3. Windows: `%APPDATA%\quotedesk`

use std::path::PathBuf;

use crate::error::QuoteError;

/// Manages all paths used by quotedesk
#[derive(Debug, Clone)]
pub struct QuotePaths {
    /// Base directory for all quotedesk data
    base_dir: PathBuf,
}

impl QuotePaths {
    /// Create a new QuotePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home/config directory can be determined.
    pub fn new() -> Result<Self, QuoteError> {
        let base_dir = if let Ok(custom) = std::env::var("QUOTEDESK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create QuotePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Entity catalogs
    pub fn catalog_file(&self) -> PathBuf {
        self.data_dir().join("catalog.json")
    }

    /// Entity -> master service name mappings
    pub fn mappings_file(&self) -> PathBuf {
        self.data_dir().join("service_mappings.json")
    }

    /// Per-account workflow templates
    pub fn workflows_file(&self) -> PathBuf {
        self.data_dir().join("workflows.json")
    }

    /// Per-account service configuration (labels, dividers, rounding)
    pub fn service_config_file(&self) -> PathBuf {
        self.data_dir().join("service_config.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), QuoteError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| QuoteError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| QuoteError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if quotedesk has been initialized (catalog exists)
    pub fn is_initialized(&self) -> bool {
        self.catalog_file().exists()
    }
}

/// Resolve the default data directory path based on platform
fn resolve_default_path() -> Result<PathBuf, QuoteError> {
    // BaseDirs honours XDG_CONFIG_HOME on Unix and APPDATA on Windows
    let dirs = directories::BaseDirs::new()
        .ok_or_else(|| QuoteError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("quotedesk"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuotePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var("QUOTEDESK_DATA_DIR", custom_path);

        let paths = QuotePaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var("QUOTEDESK_DATA_DIR");
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuotePaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuotePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.mappings_file(),
            temp_dir.path().join("data").join("service_mappings.json")
        );
        assert_eq!(
            paths.workflows_file(),
            temp_dir.path().join("data").join("workflows.json")
        );
    }
}
