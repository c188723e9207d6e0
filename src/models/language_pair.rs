//! Language pairs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuoteError;

const SEPARATOR: &str = " into ";

/// An ordered (source, target) combination driving word-rate lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Append to a list unless already present; returns whether it was added
    pub fn push_unique(pairs: &mut Vec<LanguagePair>, pair: LanguagePair) -> bool {
        if pairs.contains(&pair) {
            return false;
        }
        pairs.push(pair);
        true
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.source, SEPARATOR, self.target)
    }
}

impl FromStr for LanguagePair {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, target) = s.split_once(SEPARATOR).ok_or_else(|| {
            QuoteError::Validation(format!(
                "Language pair '{}' must look like '<source> into <target>'",
                s
            ))
        })?;
        let (source, target) = (source.trim(), target.trim());
        if source.is_empty() || target.is_empty() {
            return Err(QuoteError::Validation(format!(
                "Language pair '{}' is missing a language",
                s
            )));
        }
        Ok(Self::new(source, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let pair: LanguagePair = "English (US) into German (Germany)".parse().unwrap();
        assert_eq!(pair.source, "English (US)");
        assert_eq!(pair.target, "German (Germany)");
        assert_eq!(pair.to_string(), "English (US) into German (Germany)");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("English to German".parse::<LanguagePair>().is_err());
        assert!(" into German".parse::<LanguagePair>().is_err());
    }

    #[test]
    fn test_push_unique() {
        let mut pairs = Vec::new();
        assert!(LanguagePair::push_unique(&mut pairs, LanguagePair::new("English", "French")));
        assert!(!LanguagePair::push_unique(&mut pairs, LanguagePair::new("English", "French")));
        assert_eq!(pairs.len(), 1);
    }
}
