//! quotedesk - quote calculation for translation services
//!
//! This library prices translation work across several billing entities.
//! Every entity has its own service catalog; mapping tables relate each
//! entity's service names to the master entity's, so a workflow stored in
//! master vocabulary can be quoted in any entity's terms.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (catalog, mappings, rate sheet, quotes)
//! - `storage`: JSON document storage layer
//! - `services`: Business logic layer (mapper, rate engine, translator)
//! - `audit`: Audit logging system
//! - `export`: Charge export in CSV, JSON and YAML
//! - `display`: Terminal formatting
//! - `cli`: Command definitions and handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use quotedesk::config::paths::QuotePaths;
//! use quotedesk::storage::Storage;
//!
//! let storage = Storage::new(QuotePaths::new()?)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{QuoteError, QuoteResult};
