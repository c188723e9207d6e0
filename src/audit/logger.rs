//! Append-only audit log
//!
//! One JSON object per line. Entries are flushed as soon as they are written.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{QuoteError, QuoteResult};

use super::entry::AuditEntry;

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    fn open_for_append(&self) -> QuoteResult<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| QuoteError::Io(format!("Failed to open audit log: {}", e)))
    }

    /// Append one entry
    pub fn log(&self, entry: &AuditEntry) -> QuoteResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> QuoteResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = self.open_for_append()?;
        for entry in entries {
            let json = serde_json::to_string(entry)
                .map_err(|e| QuoteError::Json(format!("Failed to serialize audit entry: {}", e)))?;
            writeln!(file, "{}", json)
                .map_err(|e| QuoteError::Io(format!("Failed to write audit entry: {}", e)))?;
        }
        file.flush()
            .map_err(|e| QuoteError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// All entries, oldest first
    ///
    /// Lines that do not parse are skipped with a warning; a truncated last
    /// line must not hide the rest of the history.
    pub fn read_all(&self) -> QuoteResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| QuoteError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                QuoteError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(err) => tracing::warn!(line = line_num + 1, %err, "skipping unreadable audit entry"),
            }
        }

        Ok(entries)
    }

    /// The most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> QuoteResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn workflow_entry(i: usize) -> AuditEntry {
        AuditEntry::create(
            EntityType::Workflow,
            format!("Acme/WF{}", i),
            None,
            &json!(["Translation"]),
        )
    }

    #[test]
    fn test_log_and_read_recent() {
        let (logger, _temp) = logger();
        for i in 0..10 {
            logger.log(&workflow_entry(i)).unwrap();
        }

        let recent = logger.read_recent(3).unwrap();
        let ids: Vec<&str> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["Acme/WF7", "Acme/WF8", "Acme/WF9"]);
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = logger();
        assert!(logger.read_all().unwrap().is_empty());
        logger.log_batch(&[]).unwrap();
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_truncated_line_is_skipped() {
        let (logger, _temp) = logger();
        logger.log(&workflow_entry(1)).unwrap();
        let mut file = OpenOptions::new().append(true).open(logger.path()).unwrap();
        writeln!(file, "{{\"timestamp\":").unwrap();
        logger.log(&workflow_entry(2)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].operation, Operation::Create);
    }
}
