//! Service layer for quotedesk
//!
//! Business logic on top of the storage layer: mapping maintenance, entity
//! management, workflow storage, translation between entity vocabularies
//! and the rate engine that prices a quote.

pub mod catalog;
pub mod engine;
pub mod mapper;
pub mod quote;
pub mod translator;
pub mod workflow;

pub use catalog::{CatalogService, CreatedEntity, SyncStatus};
pub use engine::{QuoteOptions, RateEngine, SelectedService};
pub use mapper::MappingService;
pub use quote::{QuoteRequest, QuoteService, ServiceSelection};
pub use translator::{TranslationResult, WorkflowTranslator};
pub use workflow::WorkflowService;
