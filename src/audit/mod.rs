//! Audit log for quotedesk
//!
//! Every persisted mutation (catalog edits, mapping changes, workflow and
//! account CRUD, configuration saves) appends an `AuditEntry` to
//! `audit.log` after the document write succeeded.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
