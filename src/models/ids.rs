//! Quote identifiers
//!
//! Every generated quote gets a random id so that exported files can be
//! matched back to the run that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of one "generate charges" run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(Uuid);

impl QuoteId {
    const PREFIX: &'static str = "qte-";

    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for QuoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, &self.0.to_string()[..8])
    }
}

impl FromStr for QuoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix(Self::PREFIX).unwrap_or(s);
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_id_display() {
        let id = QuoteId::new();
        let display = id.to_string();
        assert!(display.starts_with("qte-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_quote_id_parse() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: QuoteId = uuid_str.parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
        assert_ne!(QuoteId::new(), id);
    }
}
