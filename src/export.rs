use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Writes the entries as a two-space indented JSON array, replacing any
/// existing file. Non-ASCII text is written as-is. Returns the entry count.
pub fn write_json(path: &Path, entries: &[Value]) -> Result<usize> {
    let mut text = serde_json::to_string_pretty(entries)?;
    text.push('\n');
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    fs::write(path, text).map_err(|e| PipelineError::io(path, e))?;
    Ok(entries.len())
}
