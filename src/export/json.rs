//! JSON quote export
//!
//! The charges of a quote plus the metadata a reader needs to trace it
//! back: quote id, timestamps, account, entity and fallback pairs.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, QuoteResult};
use crate::models::{PairCharges, Quote};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Exported quote document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub quote_id: String,
    pub created_at: DateTime<Utc>,
    pub account: String,
    pub entity: String,

    /// Pairs quoted with Translation because Machine Translation had no rate
    pub fallback_pairs: Vec<String>,

    /// Sum of every row's quantity times rate
    pub total: f64,

    pub pairs: Vec<PairCharges>,
}

impl QuoteExport {
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            quote_id: quote.id.as_uuid().to_string(),
            created_at: quote.created_at,
            account: quote.account.clone(),
            entity: quote.entity.clone(),
            fallback_pairs: quote.fallback_pairs().iter().map(ToString::to_string).collect(),
            total: quote.total(),
            pairs: quote.pairs.clone(),
        }
    }
}

/// Export a quote to JSON
pub fn export_quote_json<W: Write>(quote: &Quote, writer: &mut W, pretty: bool) -> QuoteResult<()> {
    let export = QuoteExport::from_quote(quote);
    let result = if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    };
    result.map_err(|e| QuoteError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| QuoteError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LanguagePair, Service, ServiceRow, UnitOfMeasure};

    #[test]
    fn test_json_carries_metadata() {
        let svc = Service::new("Language Services", "Translation", "Translation", UnitOfMeasure::Word);
        let quote = Quote::new(
            "Acme",
            "TPTDE",
            vec![PairCharges {
                pair: LanguagePair::new("English", "Spanish"),
                rows: vec![ServiceRow::for_service(&svc, svc.role(), 200.0, Some(0.5))],
                fell_back_to_translation: true,
            }],
        );

        let mut output = Vec::new();
        export_quote_json(&quote, &mut output, false).unwrap();
        let parsed: QuoteExport = serde_json::from_slice(&output).unwrap();

        assert_eq!(parsed.quote_id, quote.id.as_uuid().to_string());
        assert_eq!(parsed.entity, "TPTDE");
        assert_eq!(parsed.fallback_pairs, vec!["English into Spanish"]);
        assert_eq!(parsed.total, 100.0);
        assert_eq!(parsed.pairs, quote.pairs);
    }
}
