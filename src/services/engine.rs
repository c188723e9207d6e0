//! Rate & quantity calculation engine
//!
//! A pure function of its inputs: rate sheet, account configuration, the
//! selected services, word counts and quote options. Per language pair it
//! builds one row per service, applies the minimum-fee floor, then fills in
//! the percentage fees in row order.

use crate::models::{
    AccountConfig, FileType, LanguagePair, PairCharges, RateSheet, Service, ServiceKind,
    ServiceRole, ServiceRow, WordCountInput,
};

/// Relative tolerance, in ulps, for float noise when rounding hours up
const CEIL_ULPS: f64 = 4.0;

/// Round to 6 decimal places
pub fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Hours for a word count, rounded up to the increment and floored at `min_rate`
///
/// A zero divider yields `min_rate`.
pub fn hourly_quantity(wc: f64, divider: f64, increment: f64, min_rate: f64) -> f64 {
    if divider == 0.0 {
        return min_rate;
    }
    let hours = wc / divider;
    let steps = hours / increment;
    let nearest = steps.round();
    let steps = if (steps - nearest).abs() <= steps.abs() * CEIL_ULPS * f64::EPSILON {
        nearest
    } else {
        steps.ceil()
    };
    (steps * increment).max(min_rate)
}

/// Force primary translation rows to the minimum fee when the word services fall short
///
/// Word services other than Back Translation are summed. Under the floor,
/// Translation and Machine Translation rows become a flat minimum and every
/// other counted Word row loses its quantity. Back Translation is floored
/// on its own.
pub fn apply_minimum_fee(rows: &mut [ServiceRow], min_fee: f64) {
    let counted = |row: &ServiceRow| {
        row.kind == ServiceKind::Word && row.role != ServiceRole::BackTranslation
    };

    let word_sum: f64 = rows.iter().filter(|r| counted(r)).map(ServiceRow::amount).sum();
    if word_sum < min_fee {
        for row in rows.iter_mut() {
            if row.role.is_primary_translation() {
                row.force_minimum(min_fee);
            } else if counted(row) {
                row.quantity = 0.0;
            }
        }
    }

    if let Some(bt) = rows
        .iter_mut()
        .find(|r| r.role == ServiceRole::BackTranslation)
    {
        if bt.amount() < min_fee {
            bt.force_minimum(min_fee);
        }
    }
}

/// Compute the base amount of every percentage fee, in row order
///
/// Project Management takes the rows above it; Rush Premium also counts
/// its own row, whose rate is still pending and contributes nothing.
pub fn apply_percentage_rates(rows: &mut [ServiceRow]) {
    for i in 0..rows.len() {
        let upto = match rows[i].role {
            ServiceRole::ProjectManagementFee => i,
            ServiceRole::RushPremiumFee => i + 1,
            _ => continue,
        };
        let base: f64 = rows[..upto].iter().map(ServiceRow::amount).sum();
        rows[i].rate = Some(round6(base));
    }
}

/// Per-quote options that are not word counts
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteOptions {
    pub file_type: FileType,
    pub min_fee: f64,
    /// Project Management percentage; the account default when `None`
    pub pm_percent: Option<f64>,
    pub rush_percent: f64,
}

impl Default for QuoteOptions {
    fn default() -> Self {
        Self {
            file_type: FileType::Live,
            min_fee: 0.0,
            pm_percent: None,
            rush_percent: 25.0,
        }
    }
}

/// A service picked for a quote
///
/// `service` is what the row shows (the quoting entity's catalog data);
/// `pricing_key` is the master name under which rates and configuration
/// are looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedService {
    pub service: Service,
    pub pricing_key: String,
}

impl SelectedService {
    pub fn new(service: Service, pricing_key: impl Into<String>) -> Self {
        Self {
            service,
            pricing_key: pricing_key.into(),
        }
    }

    /// Explicit catalog role, otherwise inferred from the master name
    pub fn role(&self) -> ServiceRole {
        self.service
            .role
            .unwrap_or_else(|| ServiceRole::from_service_name(&self.pricing_key))
    }
}

impl From<Service> for SelectedService {
    fn from(service: Service) -> Self {
        let pricing_key = service.name.clone();
        Self {
            service,
            pricing_key,
        }
    }
}

/// Engine bound to one rate sheet and one account's configuration
pub struct RateEngine<'a> {
    rate_sheet: &'a RateSheet,
    config: &'a AccountConfig,
}

impl<'a> RateEngine<'a> {
    pub fn new(rate_sheet: &'a RateSheet, config: &'a AccountConfig) -> Self {
        Self { rate_sheet, config }
    }

    /// Quantity of an Hour service
    pub fn calculate_hourly_quantity(
        &self,
        service: &str,
        input: &WordCountInput,
        file_type: FileType,
    ) -> f64 {
        let settings = self.config.hourly(service).cloned().unwrap_or_default();
        let (divider, wc) = match input {
            WordCountInput::Qtc(counts) => {
                let qtc = &settings.qtc;
                let wc = if qtc.use_wc_for_translation {
                    counts.tc_translation
                } else if qtc.use_wc_for_revision {
                    counts.tc_revision
                } else {
                    0.0
                };
                (qtc.dividers.for_file_type(file_type), wc)
            }
            WordCountInput::QuoteMe(counts) => (
                settings.quote_me.for_file_type(file_type),
                counts.total_words(),
            ),
        };

        hourly_quantity(
            wc,
            divider,
            self.config.increment_rate(),
            self.config.min_hourly_rate(),
        )
    }

    /// Quantity of a Word (or plain Fee) service: sum of its configured fields
    pub fn word_quantity(&self, service: &str, input: &WordCountInput) -> f64 {
        input.sum_labels(self.config.word_labels(service, input.mode()))
    }

    /// Word rate for a pair; warns when a primary translation column is missing
    pub fn word_rate(&self, pair: &LanguagePair, service: &str, role: ServiceRole) -> f64 {
        if role.is_primary_translation()
            && !self.rate_sheet.has_column(self.rate_sheet.word_rate_column(service))
        {
            tracing::warn!(%service, "service not found in rate sheet");
        }
        self.rate_sheet.word_rate(pair, service)
    }

    pub fn hourly_rate(&self, service: &str) -> f64 {
        self.rate_sheet.hourly_rate(service)
    }

    fn build_row(
        &self,
        pair: &LanguagePair,
        selected: &SelectedService,
        input: &WordCountInput,
        options: &QuoteOptions,
    ) -> ServiceRow {
        let key = selected.pricing_key.as_str();
        let role = selected.role();
        let (quantity, rate) = match (selected.service.kind(), role) {
            (_, ServiceRole::ProjectManagementFee) => (
                options
                    .pm_percent
                    .unwrap_or_else(|| self.config.default_pm_percent())
                    / 100.0,
                None,
            ),
            (_, ServiceRole::RushPremiumFee) => (options.rush_percent / 100.0, None),
            (ServiceKind::Word, _) => (
                self.word_quantity(key, input),
                Some(self.word_rate(pair, key, role)),
            ),
            (ServiceKind::Hour, _) => (
                self.calculate_hourly_quantity(key, input, options.file_type),
                Some(self.hourly_rate(key)),
            ),
            (ServiceKind::Percentage, _) => (self.word_quantity(key, input), Some(0.0)),
        };

        tracing::debug!(%pair, service = %selected.service.name, quantity, ?rate, "row computed");
        ServiceRow::for_service(&selected.service, role, quantity, rate)
    }

    /// Rows for one language pair with minimum fee and percentages applied
    pub fn calculate_pair(
        &self,
        pair: &LanguagePair,
        services: &[SelectedService],
        input: &WordCountInput,
        options: &QuoteOptions,
    ) -> Vec<ServiceRow> {
        let mut rows: Vec<ServiceRow> = services
            .iter()
            .map(|s| self.build_row(pair, s, input, options))
            .collect();
        apply_minimum_fee(&mut rows, options.min_fee);
        apply_percentage_rates(&mut rows);
        rows
    }

    /// Services to quote for one pair, with the Machine Translation fallback
    ///
    /// With Machine Translation selected, Translation rows are dropped when
    /// the pair has an MT rate. Without one the pair falls back: MT rows are
    /// dropped and a Translation row leads the list. Returns the list and
    /// whether the pair fell back.
    pub fn services_for_pair(
        &self,
        pair: &LanguagePair,
        services: &[SelectedService],
        fallback_translation: Option<&SelectedService>,
    ) -> (Vec<SelectedService>, bool) {
        let Some(mt) = services
            .iter()
            .find(|s| s.role() == ServiceRole::MachineTranslation)
        else {
            return (services.to_vec(), false);
        };

        if self.rate_sheet.word_rate(pair, &mt.pricing_key) > 0.0 {
            let kept = services
                .iter()
                .filter(|s| s.role() != ServiceRole::Translation)
                .cloned()
                .collect();
            return (kept, false);
        }

        let translation = services
            .iter()
            .find(|s| s.role() == ServiceRole::Translation)
            .or(fallback_translation)
            .cloned();
        let mut kept: Vec<SelectedService> = services
            .iter()
            .filter(|s| {
                !matches!(
                    s.role(),
                    ServiceRole::MachineTranslation | ServiceRole::Translation
                )
            })
            .cloned()
            .collect();
        match translation {
            Some(t) => kept.insert(0, t),
            None => tracing::warn!(%pair, "no Translation service available for the fallback"),
        }
        tracing::info!(%pair, "no Machine Translation rate, using Translation");
        (kept, true)
    }

    /// Generate the charges of every language pair
    pub fn generate(
        &self,
        pairs: &[LanguagePair],
        services: &[SelectedService],
        fallback_translation: Option<&SelectedService>,
        input: &WordCountInput,
        options: &QuoteOptions,
    ) -> Vec<PairCharges> {
        pairs
            .iter()
            .map(|pair| {
                let (selected, fell_back) =
                    self.services_for_pair(pair, services, fallback_translation);
                PairCharges {
                    pair: pair.clone(),
                    rows: self.calculate_pair(pair, &selected, input, options),
                    fell_back_to_translation: fell_back,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Dividers, HourlySettings, QtcCounts, QtcHourly, QuoteMeCounts, ServiceSettings,
        UnitOfMeasure, WordLabels,
    };

    const SHEET: &str = "\
Source Language,Target Language,Translation,Machine Translation,Proofreading,Back Translation,TM - Fuzzy Match,Formatting
English,German,0.10,0.04,0.02,0.08,0.05,40
English,French,0.12,,0.03,0.09,0.06,
";

    fn sheet() -> RateSheet {
        RateSheet::from_csv_reader(SHEET.as_bytes()).unwrap()
    }

    fn word(name: &str) -> SelectedService {
        Service::new("Language Services", "Translation", name, UnitOfMeasure::Word).into()
    }

    fn fee(name: &str) -> SelectedService {
        Service::new("Project Management", "", name, UnitOfMeasure::Fee).into()
    }

    fn hour(name: &str) -> SelectedService {
        Service::new("Desktop Publishing", "Translation", name, UnitOfMeasure::Hour).into()
    }

    fn config() -> AccountConfig {
        let mut config = AccountConfig::default();
        let new_words = ServiceSettings::Word(WordLabels {
            quote_me: vec!["New Words:".into()],
            qtc: vec!["TC WC for TRANSLATION:".into()],
        });
        config.set_service("Translation", new_words.clone());
        config.set_service("Machine Translation", new_words.clone());
        config.set_service("Proofreading", new_words.clone());
        config.set_service("Back Translation", new_words);
        config.set_service(
            "TM - Fuzzy Matches",
            ServiceSettings::Word(WordLabels {
                quote_me: vec!["Repetitions:".into(), "Fuzzy Matches:".into()],
                qtc: Vec::new(),
            }),
        );
        let dividers = Dividers {
            live_divider: Some(1000.0),
            dead_divider: Some(0.0),
        };
        config.set_service(
            "Formatting",
            ServiceSettings::Hourly(HourlySettings {
                quote_me: dividers.clone(),
                qtc: QtcHourly {
                    dividers,
                    use_wc_for_translation: false,
                    use_wc_for_revision: true,
                },
            }),
        );
        config
    }

    fn quoteme(new_words: f64) -> WordCountInput {
        WordCountInput::QuoteMe(QuoteMeCounts {
            new_words,
            ..Default::default()
        })
    }

    fn english_german() -> LanguagePair {
        LanguagePair::new("English", "German")
    }

    #[test]
    fn test_hourly_rounding_examples() {
        assert_eq!(hourly_quantity(1300.0, 1000.0, 0.25, 0.5), 1.5);
        assert_eq!(hourly_quantity(0.0, 1000.0, 0.25, 0.5), 0.5);
        assert_eq!(hourly_quantity(1500.0, 1000.0, 0.25, 0.5), 1.5);
        assert_eq!(hourly_quantity(5000.0, 0.0, 0.25, 0.5), 0.5);
        // 1.1 / 0.1 is 11.000000000000002 in binary floating point
        assert!((hourly_quantity(1.1, 1.0, 0.1, 0.0) - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_hourly_rounding_never_undercuts_raw_hours() {
        let raw = 1000.0000001 / 1000.0;
        let q = hourly_quantity(1000.0000001, 1000.0, 0.25, 0.0);
        assert!(q >= raw);
        assert_eq!(q, 1.25);
        assert_eq!(hourly_quantity(1000.0, 1000.0, 0.25, 0.0), 1.0);
    }

    #[test]
    fn test_hourly_rounding_is_monotonic_and_bounded() {
        let (divider, increment, min_rate) = (750.0, 0.25, 0.5);
        let mut previous = 0.0;
        for wc in (0..20_000).step_by(37) {
            let wc = wc as f64;
            let q = hourly_quantity(wc, divider, increment, min_rate);
            assert!(q >= previous);
            assert!(q >= min_rate);
            assert!(q + 1e-9 >= wc / divider);
            let steps = q / increment;
            assert!((steps - steps.round()).abs() < 1e-9);
            previous = q;
        }
    }

    #[test]
    fn test_hourly_quantity_modes() {
        let sheet = sheet();
        let config = config();
        let engine = RateEngine::new(&sheet, &config);

        let input = WordCountInput::QuoteMe(QuoteMeCounts {
            context: 300.0,
            new_words: 1000.0,
            ..Default::default()
        });
        assert_eq!(engine.calculate_hourly_quantity("Formatting", &input, FileType::Live), 1.5);
        assert_eq!(engine.calculate_hourly_quantity("Formatting", &input, FileType::Dead), 0.5);

        let qtc = WordCountInput::Qtc(QtcCounts {
            tc_translation: 9000.0,
            tc_revision: 2600.0,
        });
        assert_eq!(engine.calculate_hourly_quantity("Formatting", &qtc, FileType::Live), 2.75);
        // Unconfigured QTC service reads no word count at all
        assert_eq!(engine.calculate_hourly_quantity("Review", &qtc, FileType::Live), 0.5);
        // Unconfigured QuoteMe service divides by one
        assert_eq!(engine.calculate_hourly_quantity("Review", &input, FileType::Live), 1300.0);
    }

    #[test]
    fn test_hourly_quantity_qtc_word_count_flags() {
        let sheet = sheet();
        let mut config = AccountConfig::default();
        let qtc_hourly = |translation: bool, revision: bool| {
            ServiceSettings::Hourly(HourlySettings {
                quote_me: Dividers::default(),
                qtc: QtcHourly {
                    dividers: Dividers {
                        live_divider: Some(1000.0),
                        dead_divider: Some(500.0),
                    },
                    use_wc_for_translation: translation,
                    use_wc_for_revision: revision,
                },
            })
        };
        config.set_service("Formatting", qtc_hourly(true, false));
        config.set_service("Desktop Publishing", qtc_hourly(true, true));
        config.set_service("Review", qtc_hourly(false, false));
        let engine = RateEngine::new(&sheet, &config);

        let qtc = WordCountInput::Qtc(QtcCounts {
            tc_translation: 1300.0,
            tc_revision: 2600.0,
        });
        assert_eq!(engine.calculate_hourly_quantity("Formatting", &qtc, FileType::Live), 1.5);
        assert_eq!(engine.calculate_hourly_quantity("Formatting", &qtc, FileType::Dead), 2.75);
        // Translation count wins when both flags are set
        assert_eq!(
            engine.calculate_hourly_quantity("Desktop Publishing", &qtc, FileType::Live),
            1.5
        );
        assert_eq!(engine.calculate_hourly_quantity("Review", &qtc, FileType::Live), 0.5);
    }

    #[test]
    fn test_minimum_fee_floor_replacement() {
        let sheet = sheet();
        let config = config();
        let engine = RateEngine::new(&sheet, &config);

        let services = vec![word("Translation"), word("Proofreading")];
        let options = QuoteOptions {
            min_fee: 150.0,
            ..Default::default()
        };
        let input = quoteme(100.0);
        let rows = engine.calculate_pair(&LanguagePair::new("English", "French"), &services, &input, &options);

        assert_eq!(rows[0].unit_of_measure, UnitOfMeasure::Minimum);
        assert_eq!(rows[0].quantity, 1.0);
        assert_eq!(rows[0].rate, Some(150.0));
        assert_eq!(rows[1].quantity, 0.0);
        assert_eq!(rows[1].unit_of_measure, UnitOfMeasure::Word);
    }

    #[test]
    fn test_minimum_fee_spec_example() {
        let translation = Service::new("", "", "Translation", UnitOfMeasure::Word);
        let proofreading = Service::new("", "", "Proofreading", UnitOfMeasure::Word);
        let mut rows = vec![
            ServiceRow::for_service(&translation, translation.role(), 100.0, Some(0.05)),
            ServiceRow::for_service(&proofreading, proofreading.role(), 100.0, Some(0.02)),
        ];
        apply_minimum_fee(&mut rows, 150.0);

        assert_eq!(rows[0].unit_of_measure, UnitOfMeasure::Minimum);
        assert_eq!((rows[0].quantity, rows[0].rate), (1.0, Some(150.0)));
        assert_eq!(rows[1].quantity, 0.0);
    }

    #[test]
    fn test_back_translation_floored_separately() {
        let sheet = sheet();
        let config = config();
        let engine = RateEngine::new(&sheet, &config);

        let services = vec![word("Translation"), word("Back Translation")];
        let options = QuoteOptions {
            min_fee: 150.0,
            ..Default::default()
        };
        // Translation 2000 * 0.10 = 200 clears the floor, BT 2000 * 0.08 = 160 too
        let rows = engine.calculate_pair(&english_german(), &services, &quoteme(2000.0), &options);
        assert_eq!(rows[0].unit_of_measure, UnitOfMeasure::Word);
        assert_eq!(rows[1].unit_of_measure, UnitOfMeasure::Word);

        // 1000 words: Translation 100 and BT 80, both under the floor
        let rows = engine.calculate_pair(&english_german(), &services, &quoteme(1000.0), &options);
        assert_eq!(rows[0].rate, Some(150.0));
        assert_eq!(rows[1].unit_of_measure, UnitOfMeasure::Minimum);
        assert_eq!(rows[1].rate, Some(150.0));
    }

    #[test]
    fn test_percentage_chaining() {
        let sheet = sheet();
        let config = config();
        let engine = RateEngine::new(&sheet, &config);

        let services = vec![
            word("Translation"),
            fee("Project Management"),
            fee("Rush Premium"),
        ];
        let rows = engine.calculate_pair(
            &english_german(),
            &services,
            &quoteme(1000.0),
            &QuoteOptions::default(),
        );

        assert!((rows[0].amount() - 100.0).abs() < 1e-9);
        assert_eq!(rows[1].quantity, 0.10);
        assert_eq!(rows[1].rate, Some(100.0));
        assert!((rows[1].amount() - 10.0).abs() < 1e-9);
        assert_eq!(rows[2].quantity, 0.25);
        assert_eq!(rows[2].rate, Some(110.0));
        assert!((rows[2].amount() - 27.5).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_uses_corrected_values() {
        let sheet = sheet();
        let config = config();
        let engine = RateEngine::new(&sheet, &config);

        let services = vec![word("Translation"), fee("Project Management")];
        let options = QuoteOptions {
            min_fee: 150.0,
            pm_percent: Some(20.0),
            ..Default::default()
        };
        let rows = engine.calculate_pair(&english_german(), &services, &quoteme(100.0), &options);
        assert_eq!(rows[1].quantity, 0.20);
        assert_eq!(rows[1].rate, Some(150.0));
    }

    #[test]
    fn test_plain_fee_has_zero_rate() {
        let sheet = sheet();
        let config = config();
        let engine = RateEngine::new(&sheet, &config);

        let courier: SelectedService =
            Service::new("Handling & Delivery", "", "Courrier", UnitOfMeasure::Fee).into();
        let rows = engine.calculate_pair(&english_german(), &[courier], &quoteme(10.0), &QuoteOptions::default());
        assert_eq!(rows[0].rate, Some(0.0));
        assert_eq!(rows[0].quantity, 0.0);
    }

    #[test]
    fn test_word_quantity_and_alias_rate() {
        let sheet = sheet();
        let config = config();
        let engine = RateEngine::new(&sheet, &config);

        let input = WordCountInput::QuoteMe(QuoteMeCounts {
            repetitions: 100.0,
            fuzzy_matches: 50.0,
            ..Default::default()
        });
        let rows = engine.calculate_pair(
            &english_german(),
            &[word("TM - Fuzzy Matches")],
            &input,
            &QuoteOptions::default(),
        );
        assert_eq!(rows[0].quantity, 150.0);
        assert_eq!(rows[0].rate, Some(0.05));
    }

    #[test]
    fn test_machine_translation_fallback() {
        let sheet = sheet();
        let config = config();
        let engine = RateEngine::new(&sheet, &config);

        let services = vec![word("Machine Translation"), word("Proofreading")];
        let fallback = word("Translation");
        let pairs = vec![english_german(), LanguagePair::new("English", "French")];
        let charges = engine.generate(
            &pairs,
            &services,
            Some(&fallback),
            &quoteme(1000.0),
            &QuoteOptions::default(),
        );

        let de: Vec<&str> = charges[0].rows.iter().map(|r| r.service.as_str()).collect();
        assert_eq!(de, vec!["Machine Translation", "Proofreading"]);
        assert!(!charges[0].fell_back_to_translation);

        let fr: Vec<&str> = charges[1].rows.iter().map(|r| r.service.as_str()).collect();
        assert_eq!(fr, vec!["Translation", "Proofreading"]);
        assert!(charges[1].fell_back_to_translation);
    }

    #[test]
    fn test_machine_translation_drops_selected_translation() {
        let sheet = sheet();
        let config = config();
        let engine = RateEngine::new(&sheet, &config);

        let services = vec![
            word("Proofreading"),
            word("Translation"),
            word("Machine Translation"),
        ];
        let (de, _) = engine.services_for_pair(&english_german(), &services, None);
        assert!(de.iter().all(|s| s.role() != ServiceRole::Translation));

        let (fr, fell_back) =
            engine.services_for_pair(&LanguagePair::new("English", "French"), &services, None);
        assert!(fell_back);
        assert_eq!(fr[0].service.name, "Translation");
        assert_eq!(fr.len(), 2);
    }

    #[test]
    fn test_role_follows_pricing_key() {
        let entity_service = Service::new("Language Services", "Translation", "Übersetzung", UnitOfMeasure::Word);
        let selected = SelectedService::new(entity_service, "Translation");
        assert_eq!(selected.role(), ServiceRole::Translation);
    }

    #[test]
    fn test_hour_rate_from_first_row() {
        let sheet = sheet();
        let config = config();
        let engine = RateEngine::new(&sheet, &config);

        let rows = engine.calculate_pair(
            &LanguagePair::new("English", "French"),
            &[hour("Formatting")],
            &quoteme(1300.0),
            &QuoteOptions::default(),
        );
        assert_eq!(rows[0].quantity, 1.5);
        assert_eq!(rows[0].rate, Some(40.0));
    }
}
