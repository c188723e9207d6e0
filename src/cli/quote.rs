//! Quote CLI command
//!
//! Generates charges for a set of language pairs from a rate sheet and
//! either prints them or writes them out in an export format.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use crate::config::settings::Settings;
use crate::display::format_quote;
use crate::error::{QuoteError, QuoteResult};
use crate::export::{export_quote, ExportFormat};
use crate::models::{
    parse_count, FileType, InputMode, LanguagePair, QtcCounts, QuoteMeCounts, RateSheet,
    WordCountInput,
};
use crate::services::{QuoteOptions, QuoteRequest, QuoteService, ServiceSelection};
use crate::storage::{Storage, DEFAULT_ACCOUNT};

/// File type options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FileTypeArg {
    /// Editable source files
    Live,
    /// Scanned or locked source files
    Dead,
}

impl From<FileTypeArg> for FileType {
    fn from(arg: FileTypeArg) -> Self {
        match arg {
            FileTypeArg::Live => FileType::Live,
            FileTypeArg::Dead => FileType::Dead,
        }
    }
}

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    /// Charges layout, one line per service row
    Csv,
    /// Rows plus quote metadata
    Json,
    /// Same document as JSON, human-readable
    Yaml,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Yaml => ExportFormat::Yaml,
        }
    }
}

/// Arguments of `quote`
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Rate sheet CSV (Source Language, Target Language, one column per rate)
    #[arg(short, long)]
    pub rates: PathBuf,

    /// Account whose workflows and configuration apply
    #[arg(short, long, default_value = DEFAULT_ACCOUNT)]
    pub account: String,

    /// Quoting entity (defaults to the master entity)
    #[arg(short, long)]
    pub entity: Option<String>,

    /// Stored workflow to quote
    #[arg(short, long, conflicts_with = "service", required_unless_present = "service")]
    pub workflow: Option<String>,

    /// Master service to quote, in order (repeatable)
    #[arg(short, long)]
    pub service: Vec<String>,

    /// Language pair as "<source> into <target>" (repeatable)
    #[arg(short, long = "pair", required = true)]
    pub pairs: Vec<String>,

    /// Use the QTC totals instead of the QuoteMe breakdown
    #[arg(long)]
    pub qtc: bool,

    /// QuoteMe: context matches
    #[arg(long, default_value = "0")]
    pub context: String,

    /// QuoteMe: 100% matches
    #[arg(long = "hundred", alias = "hundred-percent", default_value = "0")]
    pub hundred_percent: String,

    /// QuoteMe: repetitions
    #[arg(long, default_value = "0")]
    pub repetitions: String,

    /// QuoteMe: fuzzy matches
    #[arg(long, default_value = "0")]
    pub fuzzy: String,

    /// QuoteMe: new words
    #[arg(long = "new-words", default_value = "0")]
    pub new_words: String,

    /// QTC: word count for translation
    #[arg(long = "tc-translation", default_value = "0")]
    pub tc_translation: String,

    /// QTC: word count for revision
    #[arg(long = "tc-revision", default_value = "0")]
    pub tc_revision: String,

    /// Source file type, selects the hourly divider
    #[arg(long = "file-type", value_enum)]
    pub file_type: Option<FileTypeArg>,

    /// Minimum fee per language pair
    #[arg(long = "min-fee")]
    pub min_fee: Option<f64>,

    /// Project Management percentage (defaults to the account's)
    #[arg(long = "pm-percent")]
    pub pm_percent: Option<f64>,

    /// Rush Premium percentage
    #[arg(long = "rush-percent")]
    pub rush_percent: Option<f64>,

    /// Write the charges to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format (writes to stdout when no --output is given)
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormatArg>,
}

impl QuoteArgs {
    fn word_counts(&self, settings: &Settings) -> WordCountInput {
        let mode = if self.qtc {
            InputMode::Qtc
        } else {
            settings.default_input_mode
        };
        match mode {
            InputMode::QuoteMe => WordCountInput::QuoteMe(QuoteMeCounts {
                context: parse_count(&self.context),
                hundred_percent: parse_count(&self.hundred_percent),
                repetitions: parse_count(&self.repetitions),
                fuzzy_matches: parse_count(&self.fuzzy),
                new_words: parse_count(&self.new_words),
            }),
            InputMode::Qtc => WordCountInput::Qtc(QtcCounts {
                tc_translation: parse_count(&self.tc_translation),
                tc_revision: parse_count(&self.tc_revision),
            }),
        }
    }

    fn language_pairs(&self) -> QuoteResult<Vec<LanguagePair>> {
        let mut pairs = Vec::with_capacity(self.pairs.len());
        for raw in &self.pairs {
            let pair = raw.parse::<LanguagePair>()?;
            if !LanguagePair::push_unique(&mut pairs, pair) {
                tracing::warn!(pair = %raw, "duplicate language pair ignored");
            }
        }
        Ok(pairs)
    }

    fn request(&self, settings: &Settings) -> QuoteResult<QuoteRequest> {
        let selection = match &self.workflow {
            Some(workflow) => ServiceSelection::Workflow(workflow.clone()),
            None => ServiceSelection::Services(self.service.clone()),
        };
        Ok(QuoteRequest {
            account: self.account.clone(),
            entity: self.entity.clone(),
            selection,
            pairs: self.language_pairs()?,
            input: self.word_counts(settings),
            options: QuoteOptions {
                file_type: self
                    .file_type
                    .map(FileType::from)
                    .unwrap_or(settings.default_file_type),
                min_fee: self.min_fee.unwrap_or(settings.default_min_fee),
                pm_percent: self.pm_percent,
                rush_percent: self.rush_percent.unwrap_or(settings.default_rush_percent),
            },
        })
    }
}

fn load_rate_sheet(path: &Path) -> QuoteResult<RateSheet> {
    let file = File::open(path).map_err(|e| {
        QuoteError::Io(format!("Failed to open rate sheet {}: {}", path.display(), e))
    })?;
    RateSheet::from_csv_reader(file)
}

/// Handle the quote command
pub fn handle_quote_command(storage: &Storage, settings: &Settings, args: QuoteArgs) -> QuoteResult<()> {
    let rate_sheet = load_rate_sheet(&args.rates)?;
    let request = args.request(settings)?;
    let quote = QuoteService::new(storage).generate(&rate_sheet, &request)?;

    match (&args.output, args.format) {
        (Some(path), format) => {
            let format = format.map(ExportFormat::from).unwrap_or(settings.export_format);
            let file = File::create(path).map_err(|e| {
                QuoteError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            export_quote(&quote, format, &mut writer)?;
            writer.flush()?;
            println!(
                "Wrote {} rows ({}) to {}",
                quote.row_count(),
                format,
                path.display()
            );
        }
        (None, Some(format)) => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            export_quote(&quote, format.into(), &mut writer)?;
            writer.flush()?;
        }
        (None, None) => print!("{}", format_quote(&quote)),
    }

    Ok(())
}
