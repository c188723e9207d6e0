//! Charge export for quotedesk
//!
//! Writes a generated quote in one of three formats:
//! - CSV: the fixed 15-column charges layout, one line per service row
//! - JSON: rows plus quote metadata, machine-readable
//! - YAML: the same document as JSON, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_charges_csv, CHARGES_HEADER};
pub use self::json::{export_quote_json, QuoteExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_quote_yaml;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, QuoteResult};
use crate::models::Quote;

/// Output format of a quote export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(QuoteError::Export(format!("Unknown export format: {}", other))),
        }
    }
}

/// Write a quote in the given format
pub fn export_quote<W: Write>(quote: &Quote, format: ExportFormat, writer: &mut W) -> QuoteResult<()> {
    match format {
        ExportFormat::Csv => export_charges_csv(quote, writer),
        ExportFormat::Json => export_quote_json(quote, writer, true),
        ExportFormat::Yaml => export_quote_yaml(quote, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!("xlsx".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::default(), ExportFormat::Csv);
    }
}
