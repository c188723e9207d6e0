//! CSV charges export
//!
//! One line per service row with the fixed 15-column header. The first
//! row of every language pair is marked with `x`; absent values are
//! written as empty strings.

use std::io::Write;

use crate::error::{QuoteError, QuoteResult};
use crate::models::{Quote, ServiceRow};

pub const CHARGES_HEADER: [&str; 15] = [
    "Mark New Line Item",
    "Line Item Description",
    "Source",
    "Target",
    "Hide Unit Costs",
    "Hide Details",
    "Service Group 1",
    "Service Group 2",
    "Service Group 3",
    "Service",
    "UofM",
    "Quantity",
    "Rate",
    "CommentsForInvoice",
    "Technology Product",
];

/// Empty for a missing or non-finite number
fn number_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}

fn row_record(first: bool, description: &str, source: &str, target: &str, row: &ServiceRow) -> [String; 15] {
    [
        if first { "x".into() } else { String::new() },
        description.to_string(),
        source.to_string(),
        target.to_string(),
        "0".into(),
        "0".into(),
        row.service_group_1.clone(),
        row.service_group_2.clone(),
        String::new(),
        row.service.clone(),
        row.unit_of_measure.to_string(),
        number_cell(Some(row.quantity)),
        number_cell(row.rate),
        String::new(),
        String::new(),
    ]
}

/// Export every row of a quote as CSV
pub fn export_charges_csv<W: Write>(quote: &Quote, writer: &mut W) -> QuoteResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    csv_writer.write_record(CHARGES_HEADER)?;

    for charges in &quote.pairs {
        let description = charges.pair.to_string();
        for (i, row) in charges.rows.iter().enumerate() {
            csv_writer.write_record(row_record(
                i == 0,
                &description,
                &charges.pair.source,
                &charges.pair.target,
                row,
            ))?;
        }
    }

    csv_writer
        .flush()
        .map_err(|e| QuoteError::Export(e.to_string()))
}
