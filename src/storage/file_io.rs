//! JSON document I/O
//!
//! Every document is replaced as a whole: serialized into a sibling temp
//! file, synced, then renamed over the original. A failed save leaves the
//! previous document untouched.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::QuoteError;

/// Read a JSON document, falling back to `T::default()` when the file is absent
pub fn read_json<T, P>(path: P) -> Result<T, QuoteError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        tracing::debug!(path = %path.display(), "document missing, using defaults");
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| QuoteError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| QuoteError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Replace a JSON document atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), QuoteError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            QuoteError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| QuoteError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| QuoteError::Storage(format!("Failed to serialize {}: {}", path.display(), e)))?;
    writer
        .flush()
        .map_err(|e| QuoteError::Storage(format!("Failed to flush {}: {}", path.display(), e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| QuoteError::Storage(format!("Failed to sync {}: {}", path.display(), e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        QuoteError::Storage(format!("Failed to replace {}: {}", path.display(), e))
    })?;

    tracing::debug!(path = %path.display(), "document saved");
    Ok(())
}
