//! Engine output: service rows grouped by language pair

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::QuoteId;
use super::language_pair::LanguagePair;
use super::service::{Service, ServiceKind, ServiceRole, UnitOfMeasure};

/// One charge line for one service in one language pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRow {
    pub service: String,
    pub service_group_1: String,
    pub service_group_2: String,
    pub unit_of_measure: UnitOfMeasure,
    pub quantity: f64,
    /// `None` until the percentage pass has computed it
    pub rate: Option<f64>,
    pub role: ServiceRole,
    pub kind: ServiceKind,
}

impl ServiceRow {
    /// Start a row from the catalog data of a service
    pub fn for_service(service: &Service, role: ServiceRole, quantity: f64, rate: Option<f64>) -> Self {
        Self {
            service: service.name.clone(),
            service_group_1: service.service_group_1.clone(),
            service_group_2: service.service_group_2.clone(),
            unit_of_measure: service.default_unit_of_measure.clone(),
            quantity,
            rate,
            role,
            kind: service.kind(),
        }
    }

    /// `quantity * rate`, a pending rate counting as zero
    pub fn amount(&self) -> f64 {
        self.quantity * self.rate.unwrap_or(0.0)
    }

    /// Replace the row with a flat minimum charge
    pub fn force_minimum(&mut self, min_fee: f64) {
        self.unit_of_measure = UnitOfMeasure::Minimum;
        self.quantity = 1.0;
        self.rate = Some(min_fee);
    }
}

/// Rows of one language pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCharges {
    pub pair: LanguagePair,
    pub rows: Vec<ServiceRow>,
    /// Machine Translation was selected but the pair had no rate for it
    #[serde(default)]
    pub fell_back_to_translation: bool,
}

impl PairCharges {
    pub fn total(&self) -> f64 {
        self.rows.iter().map(ServiceRow::amount).sum()
    }
}

/// A generated quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub created_at: DateTime<Utc>,
    pub account: String,
    pub entity: String,
    pub pairs: Vec<PairCharges>,
}

impl Quote {
    pub fn new(account: impl Into<String>, entity: impl Into<String>, pairs: Vec<PairCharges>) -> Self {
        Self {
            id: QuoteId::new(),
            created_at: Utc::now(),
            account: account.into(),
            entity: entity.into(),
            pairs,
        }
    }

    /// Pairs that fell back from Machine Translation to Translation
    pub fn fallback_pairs(&self) -> Vec<LanguagePair> {
        self.pairs
            .iter()
            .filter(|p| p.fell_back_to_translation)
            .map(|p| p.pair.clone())
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.pairs.iter().map(PairCharges::total).sum()
    }

    pub fn row_count(&self) -> usize {
        self.pairs.iter().map(|p| p.rows.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_minimum() {
        let svc = Service::new("Language Services", "Translation", "Translation", UnitOfMeasure::Word);
        let mut row = ServiceRow::for_service(&svc, svc.role(), 100.0, Some(0.05));
        assert!((row.amount() - 5.0).abs() < 1e-9);

        row.force_minimum(150.0);
        assert_eq!(row.unit_of_measure, UnitOfMeasure::Minimum);
        assert_eq!(row.quantity, 1.0);
        assert_eq!(row.rate, Some(150.0));
        // Kind still reflects the catalog unit
        assert_eq!(row.kind, ServiceKind::Word);
    }

    #[test]
    fn test_pending_rate_counts_as_zero() {
        let svc = Service::new("Project Management", "", "Project Management", UnitOfMeasure::Fee);
        let row = ServiceRow::for_service(&svc, svc.role(), 0.1, None);
        assert_eq!(row.amount(), 0.0);
    }
}
