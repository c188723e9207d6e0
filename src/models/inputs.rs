//! Word-count inputs
//!
//! A quote is driven by one of two mutually exclusive input modes. QuoteMe
//! carries a breakdown of the analysed word counts; QTC carries the two
//! totals a translation-memory tool reports for translation and revision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which family of word-count fields is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InputMode {
    #[default]
    QuoteMe,
    #[serde(rename = "QTC")]
    Qtc,
}

impl InputMode {
    /// Key used for this mode in account service configuration
    pub fn config_key(self) -> &'static str {
        match self {
            Self::QuoteMe => "QuoteMe",
            Self::Qtc => "QTC",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_key())
    }
}

/// Classification of source documents, selects the hourly divider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FileType {
    #[default]
    Live,
    Dead,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "Live"),
            Self::Dead => write!(f, "Dead"),
        }
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "dead" => Ok(Self::Dead),
            other => Err(format!("Unknown file type '{}' (expected live or dead)", other)),
        }
    }
}

/// Parse a user-entered count; anything unparseable counts as zero
pub fn parse_count(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Canonical form of a field label: trimmed, lowercase, no trailing colon
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(':')
        .trim_end()
        .to_lowercase()
}

/// QuoteMe word-count breakdown
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteMeCounts {
    pub context: f64,
    pub hundred_percent: f64,
    pub repetitions: f64,
    pub fuzzy_matches: f64,
    pub new_words: f64,
}

impl QuoteMeCounts {
    pub const CONTEXT: &'static str = "Context:";
    pub const HUNDRED_PERCENT: &'static str = "100%:";
    pub const REPETITIONS: &'static str = "Repetitions:";
    pub const FUZZY_MATCHES: &'static str = "Fuzzy Matches:";
    pub const NEW_WORDS: &'static str = "New Words:";
    pub const TOTAL_WORDS: &'static str = "Total Words:";

    /// Sum of the five breakdown fields
    pub fn total_words(&self) -> f64 {
        self.context + self.hundred_percent + self.repetitions + self.fuzzy_matches + self.new_words
    }

    /// Value of a labelled field, `None` for unknown labels
    pub fn field(&self, label: &str) -> Option<f64> {
        let wanted = normalize_label(label);
        let value = if wanted == normalize_label(Self::CONTEXT) {
            self.context
        } else if wanted == normalize_label(Self::HUNDRED_PERCENT) {
            self.hundred_percent
        } else if wanted == normalize_label(Self::REPETITIONS) {
            self.repetitions
        } else if wanted == normalize_label(Self::FUZZY_MATCHES) {
            self.fuzzy_matches
        } else if wanted == normalize_label(Self::NEW_WORDS) {
            self.new_words
        } else if wanted == normalize_label(Self::TOTAL_WORDS) {
            self.total_words()
        } else {
            return None;
        };
        Some(value)
    }
}

/// QTC word-count totals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QtcCounts {
    pub tc_translation: f64,
    pub tc_revision: f64,
}

impl QtcCounts {
    pub const TRANSLATION: &'static str = "TC WC for TRANSLATION:";
    pub const REVISION: &'static str = "TC WC for REVISION:";

    /// Value of a labelled field, `None` for unknown labels
    pub fn field(&self, label: &str) -> Option<f64> {
        let wanted = normalize_label(label);
        if wanted == normalize_label(Self::TRANSLATION) {
            Some(self.tc_translation)
        } else if wanted == normalize_label(Self::REVISION) {
            Some(self.tc_revision)
        } else {
            None
        }
    }
}

/// Word counts for one quote, in exactly one input mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WordCountInput {
    QuoteMe(QuoteMeCounts),
    Qtc(QtcCounts),
}

impl Default for WordCountInput {
    fn default() -> Self {
        Self::QuoteMe(QuoteMeCounts::default())
    }
}

impl WordCountInput {
    pub fn mode(&self) -> InputMode {
        match self {
            Self::QuoteMe(_) => InputMode::QuoteMe,
            Self::Qtc(_) => InputMode::Qtc,
        }
    }

    /// Value of a labelled field of the active mode; unknown labels count as zero
    pub fn field(&self, label: &str) -> f64 {
        let value = match self {
            Self::QuoteMe(counts) => counts.field(label),
            Self::Qtc(counts) => counts.field(label),
        };
        value.unwrap_or(0.0)
    }

    /// Sum of the labelled fields of the active mode
    pub fn sum_labels<S: AsRef<str>>(&self, labels: &[S]) -> f64 {
        labels.iter().map(|l| self.field(l.as_ref())).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_coerces_garbage() {
        assert_eq!(parse_count("1200"), 1200.0);
        assert_eq!(parse_count(" 12.5 "), 12.5);
        assert_eq!(parse_count("abc"), 0.0);
        assert_eq!(parse_count(""), 0.0);
        assert_eq!(parse_count("NaN"), 0.0);
    }

    #[test]
    fn test_label_matching_is_lenient() {
        let counts = QuoteMeCounts {
            context: 10.0,
            hundred_percent: 20.0,
            repetitions: 30.0,
            fuzzy_matches: 40.0,
            new_words: 100.0,
        };
        assert_eq!(counts.field("New Words:"), Some(100.0));
        assert_eq!(counts.field("  new words "), Some(100.0));
        assert_eq!(counts.field("Total Words"), Some(200.0));
        assert_eq!(counts.field("Unknown:"), None);
    }

    #[test]
    fn test_sum_labels_only_reads_active_mode() {
        let quoteme = WordCountInput::QuoteMe(QuoteMeCounts {
            context: 5.0,
            hundred_percent: 7.0,
            ..Default::default()
        });
        assert_eq!(quoteme.sum_labels(&["Context:", "100%:"]), 12.0);
        assert_eq!(quoteme.sum_labels(&["TC WC for TRANSLATION:"]), 0.0);

        let qtc = WordCountInput::Qtc(QtcCounts {
            tc_translation: 900.0,
            tc_revision: 300.0,
        });
        assert_eq!(qtc.mode(), InputMode::Qtc);
        assert_eq!(qtc.sum_labels(&["tc wc for revision"]), 300.0);
        assert_eq!(qtc.sum_labels(&["Context:"]), 0.0);
    }

    #[test]
    fn test_file_type_parse() {
        assert_eq!("Dead".parse::<FileType>().unwrap(), FileType::Dead);
        assert!("zombie".parse::<FileType>().is_err());
    }
}
