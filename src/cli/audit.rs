//! Audit log CLI command

use clap::Args;

use crate::error::QuoteResult;
use crate::storage::Storage;

/// Arguments of `audit`
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Number of entries to show, newest last
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Handle the audit command
pub fn handle_audit_command(storage: &Storage, args: AuditArgs) -> QuoteResult<()> {
    let entries = storage.audit().read_recent(args.limit)?;
    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }
    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
