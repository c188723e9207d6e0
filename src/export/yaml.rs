//! YAML quote export

use std::io::Write;

use crate::error::{QuoteError, QuoteResult};
use crate::export::json::QuoteExport;
use crate::models::Quote;

/// Export a quote to YAML, preceded by a comment header
pub fn export_quote_yaml<W: Write>(quote: &Quote, writer: &mut W) -> QuoteResult<()> {
    let export = QuoteExport::from_quote(quote);

    writeln!(writer, "# quotedesk quote {}", quote.id)
        .map_err(|e| QuoteError::Export(e.to_string()))?;
    writeln!(writer, "# Account: {} / Entity: {}", export.account, export.entity)
        .map_err(|e| QuoteError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| QuoteError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| QuoteError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| QuoteError::Export(e.to_string()))
}
