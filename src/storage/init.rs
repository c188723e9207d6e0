//! First-run setup
//!
//! Writes the starter documents: the entity catalogs, position-seeded
//! mapping tables for every non-master entity, a default account with one
//! workflow, and that account's service configuration. Existing documents
//! are never overwritten.

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::QuotePaths;
use crate::error::QuoteResult;
use crate::models::{
    AccountConfig, Catalog, Dividers, Entity, HourlySettings, MappingDocument, QtcCounts,
    QtcHourly, QuoteMeCounts, Service, ServiceConfigDocument, ServiceSettings, UnitOfMeasure,
    WordLabels, WorkflowBook,
};

use super::file_io::write_json_atomic;

/// Account created on first run
pub const DEFAULT_ACCOUNT: &str = "Default";

/// What a run of [`initialize_storage`] wrote
#[derive(Debug, Default)]
pub struct InitReport {
    /// Documents written, by file name
    pub created: Vec<String>,
    /// Position-seeded pairs per entity
    pub seeded: Vec<(String, Vec<(String, String)>)>,
}

impl InitReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

type Row = (&'static str, &'static str, &'static str, &'static str);

const BASE_SERVICES: &[Row] = &[
    ("Language Services", "Translation", "Translation and Proofreading", "Word"),
    ("Language Services", "Translation", "MT full EditProof", "Word"),
    ("Language Services", "Translation", "TM - Fuzzy Matches", "Word"),
    ("Language Services", "Translation", "TM - Exact Matches", "Word"),
    ("Language Services", "Translation", "Localization", "Hour"),
    ("Desktop Publishing", "Translation", "Formatting", "Hour"),
    ("Language Services", "Translation", "Redaction", "Hour"),
    ("Language Services", "Translation", "Transcription", "Word"),
    ("Language Services", "Translation", "Proofreading", "Hour"),
    ("Language Services", "Translation", "Reconciliation", "Hour"),
    ("Language Services", "Translation", "Review", "Hour"),
    ("Language Services", "Translation", "Revision", "Hour"),
    ("Verification Services", "Notary Service", "Notary Service", "Word"),
    ("Handling & Delivery", "", "Courrier", "Fee"),
    ("Desktop Publishing", "Translation", "Desktop Publishing", "Hour"),
    ("Handling & Delivery", "", "Courier - Domestic", "Fee"),
    ("Language Services", "Translation", "Translation", "Word"),
    ("Language Services", "Translation", "Machine Translation", "Word"),
    ("Language Services", "Translation", "Back Translation", "Word"),
    ("Project Management", "", "Project Management", "Fee"),
    ("Project Management", "", "Rush Premium", "Fee"),
];

fn service((group1, group2, name, uom): Row) -> Service {
    Service::new(group1, group2, name, UnitOfMeasure::parse(uom))
}

/// The starter catalog: TPUS (master), TPTDE, TPTFR, TPTIT and TPT
pub fn default_catalog() -> Catalog {
    let base: Vec<Service> = BASE_SERVICES.iter().copied().map(service).collect();
    let with_base = |name: &str| Entity {
        name: name.to_string(),
        services: base.clone(),
    };

    // TPTFR names its formatting service differently and lists the
    // master's spelling again at the end
    let mut tptfr = with_base("TPTFR");
    for svc in tptfr.services.iter_mut().filter(|s| s.name == "Formatting") {
        svc.name = "Mise en page".to_string();
    }
    tptfr.services.push(service((
        "Desktop Publishing",
        "Translation",
        "Formatting",
        "Hour",
    )));

    Catalog::new(vec![
        with_base("TPUS"),
        with_base("TPTDE"),
        tptfr,
        with_base("TPTIT"),
        with_base("TPT"),
    ])
}

fn labels(quote_me: &[&str], qtc: &[&str]) -> ServiceSettings {
    ServiceSettings::Word(WordLabels {
        quote_me: quote_me.iter().map(|s| s.to_string()).collect(),
        qtc: qtc.iter().map(|s| s.to_string()).collect(),
    })
}

fn hourly(live: f64, dead: f64, use_translation: bool, use_revision: bool) -> ServiceSettings {
    let dividers = Dividers {
        live_divider: Some(live),
        dead_divider: Some(dead),
    };
    ServiceSettings::Hourly(HourlySettings {
        quote_me: dividers.clone(),
        qtc: QtcHourly {
            dividers,
            use_wc_for_translation: use_translation,
            use_wc_for_revision: use_revision,
        },
    })
}

/// Starter configuration for the default account
pub fn default_account_config() -> AccountConfig {
    let mut config = AccountConfig::default();

    let new_words = [QuoteMeCounts::NEW_WORDS];
    let tc_translation = [QtcCounts::TRANSLATION];
    config.set_service("Translation", labels(&new_words, &tc_translation));
    config.set_service("Machine Translation", labels(&new_words, &tc_translation));
    config.set_service("Translation and Proofreading", labels(&new_words, &tc_translation));
    config.set_service(
        "TM - Fuzzy Matches",
        labels(&[QuoteMeCounts::REPETITIONS, QuoteMeCounts::FUZZY_MATCHES], &[]),
    );
    config.set_service(
        "TM - Exact Matches",
        labels(&[QuoteMeCounts::CONTEXT, QuoteMeCounts::HUNDRED_PERCENT], &[]),
    );
    config.set_service(
        "Back Translation",
        labels(&[QuoteMeCounts::TOTAL_WORDS], &[QtcCounts::TRANSLATION]),
    );

    config.set_service("Formatting", hourly(1000.0, 500.0, true, false));
    config.set_service("Desktop Publishing", hourly(1000.0, 500.0, true, false));
    config.set_service("Review", hourly(2000.0, 2000.0, false, true));
    config.set_service("Proofreading", hourly(2000.0, 2000.0, false, true));
    config
}

fn default_workflows() -> QuoteResult<WorkflowBook> {
    let mut book = WorkflowBook::default();
    book.create_account(DEFAULT_ACCOUNT)?;
    book.create_workflow(
        DEFAULT_ACCOUNT,
        "Standard Translation",
        ["Translation", "TM - Fuzzy Matches", "TM - Exact Matches", "Project Management"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )?;
    Ok(book)
}

/// Create any missing starter document
pub fn initialize_storage(paths: &QuotePaths) -> QuoteResult<InitReport> {
    paths.ensure_directories()?;
    let mut report = InitReport::default();

    let catalog = if paths.catalog_file().exists() {
        super::file_io::read_json(paths.catalog_file())?
    } else {
        let catalog = default_catalog();
        write_json_atomic(paths.catalog_file(), &catalog)?;
        report.created.push("catalog.json".into());
        catalog
    };

    if !paths.mappings_file().exists() {
        let mut doc = MappingDocument::default();
        let audit = AuditLogger::new(paths.audit_log());
        for entity in catalog.entity_names() {
            if doc.is_master(&entity) {
                continue;
            }
            let pairs = doc.seed_by_position(&entity, &catalog);
            tracing::info!(%entity, count = pairs.len(), "seeded mappings by position");
            report.seeded.push((entity, pairs));
        }
        write_json_atomic(paths.mappings_file(), &doc)?;
        let entries: Vec<AuditEntry> = report
            .seeded
            .iter()
            .map(|(entity, pairs)| AuditEntry::seed(entity, pairs))
            .collect();
        audit.log_batch(&entries)?;
        report.created.push("service_mappings.json".into());
    }

    if !paths.workflows_file().exists() {
        write_json_atomic(paths.workflows_file(), &default_workflows()?)?;
        report.created.push("workflows.json".into());
    }

    if !paths.service_config_file().exists() {
        let mut doc = ServiceConfigDocument::default();
        doc.accounts
            .insert(DEFAULT_ACCOUNT.to_string(), default_account_config());
        write_json_atomic(paths.service_config_file(), &doc)?;
        report.created.push("service_config.json".into());
    }

    Ok(report)
}
