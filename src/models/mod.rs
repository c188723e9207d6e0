//! Core data models for quotedesk
//!
//! Plain data plus the rules that need nothing but the data: catalog
//! lookups, mapping tables, rate sheet reads, account configuration and
//! workflow bookkeeping.

pub mod catalog;
pub mod ids;
pub mod inputs;
pub mod language_pair;
pub mod mapping;
pub mod quote;
pub mod ratesheet;
pub mod service;
pub mod service_config;
pub mod workflow;

pub use catalog::{Catalog, Entity};
pub use ids::QuoteId;
pub use inputs::{
    normalize_label, parse_count, FileType, InputMode, QtcCounts, QuoteMeCounts, WordCountInput,
};
pub use language_pair::LanguagePair;
pub use mapping::{MappingDocument, ServiceMapping, DEFAULT_MASTER_ENTITY};
pub use quote::{PairCharges, Quote, ServiceRow};
pub use ratesheet::RateSheet;
pub use service::{Service, ServiceKind, ServiceRole, ServiceValidationError, UnitOfMeasure};
pub use service_config::{
    AccountConfig, Dividers, HourlySettings, QtcHourly, ServiceConfigDocument, ServiceSettings,
    WordLabels,
};
pub use workflow::{AccountSummary, WorkflowBook, Workflows};
