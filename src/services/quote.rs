//! Quote generation
//!
//! One "generate charges" run: resolve the selected master services for
//! the quoting entity, then hand them to the rate engine together with the
//! account's configuration.

use crate::error::{QuoteError, QuoteResult};
use crate::models::{LanguagePair, Quote, RateSheet, ServiceRole, WordCountInput};
use crate::storage::Storage;

use super::engine::{QuoteOptions, RateEngine, SelectedService};
use super::translator::WorkflowTranslator;
use super::workflow::WorkflowService;

/// Which services a quote covers
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceSelection {
    /// A stored workflow of the account
    Workflow(String),
    /// Master service names, in quote order
    Services(Vec<String>),
}

/// Everything needed to generate one quote
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub account: String,
    /// Quoting entity; the master entity when `None`
    pub entity: Option<String>,
    pub selection: ServiceSelection,
    pub pairs: Vec<LanguagePair>,
    pub input: WordCountInput,
    pub options: QuoteOptions,
}

/// Service that turns a request into a [`Quote`]
pub struct QuoteService<'a> {
    storage: &'a Storage,
}

impl<'a> QuoteService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Master service names selected by the request
    pub fn selected_services(&self, request: &QuoteRequest) -> QuoteResult<Vec<String>> {
        let services = match &request.selection {
            ServiceSelection::Workflow(name) => {
                WorkflowService::new(self.storage).get(&request.account, name)?
            }
            ServiceSelection::Services(names) => names.clone(),
        };
        if services.is_empty() {
            return Err(QuoteError::Validation("No services selected".into()));
        }
        Ok(services)
    }

    pub fn generate(&self, rate_sheet: &RateSheet, request: &QuoteRequest) -> QuoteResult<Quote> {
        if request.pairs.is_empty() {
            return Err(QuoteError::Validation(
                "At least one language pair is required".into(),
            ));
        }

        let master_services = self.selected_services(request)?;
        let catalog = self.storage.catalog.snapshot()?;
        let mappings = self.storage.mappings.snapshot()?;
        let master = mappings.master_entity.clone();
        let entity = request.entity.clone().unwrap_or_else(|| master.clone());
        if catalog.entity(&entity).is_none() {
            return Err(QuoteError::entity_not_found(&entity));
        }

        let translator = WorkflowTranslator::new(&catalog, &mappings);
        let mut selected = Vec::with_capacity(master_services.len());
        for result in translator.translate_workflow(&master_services, &entity, true) {
            if let Some(warning) = &result.warning {
                tracing::warn!(%entity, %warning, "quoting with the master service data");
            }
            let service = result
                .service_data
                .or_else(|| catalog.find_service(&master, &result.master_service).cloned())
                .ok_or_else(|| QuoteError::service_not_found(&result.master_service))?;
            selected.push(SelectedService::new(service, result.master_service));
        }

        let fallback_translation = catalog
            .entity(&master)
            .and_then(|m| {
                m.services
                    .iter()
                    .find(|s| s.role() == ServiceRole::Translation)
            })
            .map(|translation| {
                let data = translator
                    .translate_workflow(&[translation.name.as_str()], &entity, true)
                    .into_iter()
                    .next()
                    .and_then(|r| r.service_data)
                    .unwrap_or_else(|| translation.clone());
                SelectedService::new(data, translation.name.clone())
            });

        let config = WorkflowService::new(self.storage).account_config(&request.account)?;
        let engine = RateEngine::new(rate_sheet, &config);
        let charges = engine.generate(
            &request.pairs,
            &selected,
            fallback_translation.as_ref(),
            &request.input,
            &request.options,
        );

        let quote = Quote::new(&request.account, entity, charges);
        tracing::info!(
            id = %quote.id,
            account = %quote.account,
            entity = %quote.entity,
            rows = quote.row_count(),
            "quote generated"
        );
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::QuotePaths;
    use crate::models::{QtcCounts, QuoteMeCounts, UnitOfMeasure};
    use crate::services::mapper::MappingService;
    use crate::storage::{initialize_storage, DEFAULT_ACCOUNT};
    use tempfile::TempDir;

    const SHEET: &str = "\
Source Language,Target Language,Translation,Machine Translation,TM - Fuzzy Match,TM - Exact Match,Formatting
English,German,0.10,0.04,0.05,0.02,40
English,French,0.12,,0.06,0.03,
";

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuotePaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn request(entity: Option<&str>, selection: ServiceSelection) -> QuoteRequest {
        QuoteRequest {
            account: DEFAULT_ACCOUNT.to_string(),
            entity: entity.map(str::to_string),
            selection,
            pairs: vec![
                LanguagePair::new("English", "German"),
                LanguagePair::new("English", "French"),
            ],
            input: WordCountInput::QuoteMe(QuoteMeCounts {
                context: 100.0,
                hundred_percent: 200.0,
                repetitions: 300.0,
                fuzzy_matches: 400.0,
                new_words: 1000.0,
            }),
            options: QuoteOptions::default(),
        }
    }

    #[test]
    fn test_generate_from_workflow() {
        let (_temp, storage) = create_test_storage();
        let sheet = RateSheet::from_csv_reader(SHEET.as_bytes()).unwrap();
        let service = QuoteService::new(&storage);

        let quote = service
            .generate(
                &sheet,
                &request(None, ServiceSelection::Workflow("Standard Translation".into())),
            )
            .unwrap();

        assert_eq!(quote.entity, "TPUS");
        assert_eq!(quote.pairs.len(), 2);
        let de = &quote.pairs[0].rows;
        assert_eq!(de.len(), 4);
        assert_eq!(de[0].quantity, 1000.0);
        assert_eq!(de[1].quantity, 700.0);
        assert_eq!(de[2].quantity, 300.0);
        // 100 + 35 + 6 = 141 of billable words, 10% on top
        assert_eq!(de[3].rate, Some(141.0));
        assert_eq!(de[3].quantity, 0.10);
    }

    #[test]
    fn test_generate_in_entity_vocabulary() {
        let (_temp, storage) = create_test_storage();
        let sheet = RateSheet::from_csv_reader(SHEET.as_bytes()).unwrap();
        MappingService::new(&storage)
            .set_mapping("TPTFR", "Mise en page", "Formatting")
            .unwrap();

        let quote = QuoteService::new(&storage)
            .generate(
                &sheet,
                &request(
                    Some("TPTFR"),
                    ServiceSelection::Services(vec!["Formatting".into()]),
                ),
            )
            .unwrap();

        let row = &quote.pairs[0].rows[0];
        assert_eq!(row.service, "Mise en page");
        assert_eq!(row.unit_of_measure, UnitOfMeasure::Hour);
        // 2000 total words over a live divider of 1000
        assert_eq!(row.quantity, 2.0);
        assert_eq!(row.rate, Some(40.0));
    }

    #[test]
    fn test_generate_with_qtc_counts() {
        let (_temp, storage) = create_test_storage();
        let sheet = RateSheet::from_csv_reader(SHEET.as_bytes()).unwrap();

        let mut qtc = request(
            None,
            ServiceSelection::Services(vec!["Translation".into(), "Formatting".into()]),
        );
        qtc.pairs.truncate(1);
        qtc.input = WordCountInput::Qtc(QtcCounts {
            tc_translation: 1300.0,
            tc_revision: 400.0,
        });

        let quote = QuoteService::new(&storage).generate(&sheet, &qtc).unwrap();
        let rows = &quote.pairs[0].rows;
        assert_eq!(rows[0].quantity, 1300.0);
        assert_eq!(rows[0].rate, Some(0.1));
        // Formatting reads the translation count over a live divider of 1000
        assert_eq!(rows[1].quantity, 1.5);
        assert_eq!(rows[1].rate, Some(40.0));
    }

    #[test]
    fn test_machine_translation_fallback_reported() {
        let (_temp, storage) = create_test_storage();
        let sheet = RateSheet::from_csv_reader(SHEET.as_bytes()).unwrap();

        let quote = QuoteService::new(&storage)
            .generate(
                &sheet,
                &request(
                    None,
                    ServiceSelection::Services(vec![
                        "Machine Translation".into(),
                        "Project Management".into(),
                    ]),
                ),
            )
            .unwrap();

        assert_eq!(quote.fallback_pairs(), vec![LanguagePair::new("English", "French")]);
        assert_eq!(quote.pairs[1].rows[0].service, "Translation");
        assert_eq!(quote.pairs[0].rows[0].service, "Machine Translation");
    }

    #[test]
    fn test_invalid_requests() {
        let (_temp, storage) = create_test_storage();
        let sheet = RateSheet::from_csv_reader(SHEET.as_bytes()).unwrap();
        let service = QuoteService::new(&storage);

        let mut no_pairs = request(None, ServiceSelection::Services(vec!["Translation".into()]));
        no_pairs.pairs.clear();
        assert!(service.generate(&sheet, &no_pairs).unwrap_err().is_validation());

        let unknown_workflow = request(None, ServiceSelection::Workflow("Nope".into()));
        assert!(service.generate(&sheet, &unknown_workflow).unwrap_err().is_not_found());

        let unknown_entity = request(
            Some("TPTXX"),
            ServiceSelection::Services(vec!["Translation".into()]),
        );
        assert!(service.generate(&sheet, &unknown_entity).unwrap_err().is_not_found());

        let unknown_service = request(None, ServiceSelection::Services(vec!["Ghost".into()]));
        assert!(service.generate(&sheet, &unknown_service).unwrap_err().is_not_found());
    }
}
