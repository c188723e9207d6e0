//! Rate sheet
//!
//! Tabular rates with at least `Source Language` and `Target Language`
//! columns. Word services are priced per language pair; Hour services take
//! their single rate from the first data row.

use std::collections::HashMap;
use std::io::Read;

use super::language_pair::LanguagePair;
use crate::error::{QuoteError, QuoteResult};

pub const SOURCE_LANGUAGE: &str = "Source Language";
pub const TARGET_LANGUAGE: &str = "Target Language";

/// Service names whose rate column is spelled differently in rate sheets
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("TM - Fuzzy Matches", "TM - Fuzzy Match"),
    ("TM - Exact Matches", "TM - Exact Match"),
];

/// Parse a rate cell; empty, NaN and garbage all read as zero
fn parse_rate(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[derive(Debug, Clone)]
pub struct RateSheet {
    columns: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
    source_idx: usize,
    target_idx: usize,
}

impl RateSheet {
    /// Build a rate sheet from a header row and data rows
    ///
    /// # Errors
    ///
    /// Fails when either language column is missing.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> QuoteResult<Self> {
        let mut columns = HashMap::new();
        for (idx, header) in headers.into_iter().enumerate() {
            // First occurrence wins on duplicate headers
            columns.entry(header.trim().to_string()).or_insert(idx);
        }

        let column = |name: &str| {
            columns
                .get(name)
                .copied()
                .ok_or_else(|| QuoteError::RateSheet(format!("Missing required column '{}'", name)))
        };
        let source_idx = column(SOURCE_LANGUAGE)?;
        let target_idx = column(TARGET_LANGUAGE)?;

        Ok(Self {
            columns,
            rows,
            source_idx,
            target_idx,
        })
    }

    /// Read a rate sheet exported as CSV (first record is the header)
    pub fn from_csv_reader<R: Read>(reader: R) -> QuoteResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Self::new(headers, rows)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    fn cell<'r>(&self, row: &'r [String], column: usize) -> Option<&'r str> {
        row.get(column).map(|s| s.trim())
    }

    /// Column that holds the word rate of a service, honouring known aliases
    pub fn word_rate_column<'a>(&self, service: &'a str) -> &'a str {
        COLUMN_ALIASES
            .iter()
            .find(|(name, column)| *name == service && self.has_column(column))
            .map(|(_, column)| *column)
            .unwrap_or(service)
    }

    fn pair_row(&self, pair: &LanguagePair) -> Option<&Vec<String>> {
        self.rows.iter().find(|row| {
            self.cell(row, self.source_idx) == Some(pair.source.as_str())
                && self.cell(row, self.target_idx) == Some(pair.target.as_str())
        })
    }

    /// Word rate for a service and language pair; zero when absent
    pub fn word_rate(&self, pair: &LanguagePair, service: &str) -> f64 {
        let Some(&column) = self.columns.get(self.word_rate_column(service)) else {
            return 0.0;
        };
        self.pair_row(pair)
            .and_then(|row| self.cell(row, column))
            .map(parse_rate)
            .unwrap_or(0.0)
    }

    /// Language-independent hourly rate from the first data row; zero when absent
    pub fn hourly_rate(&self, service: &str) -> f64 {
        let Some(&column) = self.columns.get(service) else {
            return 0.0;
        };
        self.rows
            .first()
            .and_then(|row| self.cell(row, column))
            .map(parse_rate)
            .unwrap_or(0.0)
    }

    fn distinct(&self, column: usize) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for row in &self.rows {
            if let Some(value) = self.cell(row, column) {
                if !value.is_empty() && !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
            }
        }
        values
    }

    /// Distinct source languages in sheet order
    pub fn source_languages(&self) -> Vec<String> {
        self.distinct(self.source_idx)
    }

    /// Distinct target languages in sheet order
    pub fn target_languages(&self) -> Vec<String> {
        self.distinct(self.target_idx)
    }

    /// Language pairs that have a row in the sheet
    pub fn language_pairs(&self) -> Vec<LanguagePair> {
        let mut pairs = Vec::new();
        for row in &self.rows {
            if let (Some(source), Some(target)) =
                (self.cell(row, self.source_idx), self.cell(row, self.target_idx))
            {
                if !source.is_empty() && !target.is_empty() {
                    LanguagePair::push_unique(&mut pairs, LanguagePair::new(source, target));
                }
            }
        }
        pairs
    }
}
