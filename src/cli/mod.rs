//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod entity;
pub mod mapping;
pub mod quote;
pub mod workflow;

pub use audit::{handle_audit_command, AuditArgs};
pub use entity::{handle_entity_command, EntityCommands};
pub use mapping::{handle_mapping_command, MappingCommands};
pub use quote::{handle_quote_command, QuoteArgs};
pub use workflow::{handle_workflow_command, WorkflowCommands};
