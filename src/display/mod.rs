//! Display formatting for terminal output
//!
//! Plain-text tables and summaries of quotes, entities, mappings and
//! workflows.

pub mod catalog;
pub mod quote;
pub mod translation;
pub mod workflow;

pub use catalog::{format_entity_details, format_entity_list, format_mapping_table, format_sync_status};
pub use quote::format_quote;
pub use translation::{format_translation_summary, format_validation};
pub use workflow::{format_account_list, format_workflow, format_workflow_list};
