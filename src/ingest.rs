use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::normalize::FilenameNormalizer;
use crate::record::{Dataset, PersonRecord};
use crate::sheet::Table;

pub const COL_SURNAME: &str = "Surname";
pub const COL_FULL_NAME: &str = "Full Name";
pub const COL_PHOTO_FILE: &str = "Photo File Name";

/// Turns spreadsheet rows into records, in row order.
///
/// All three columns must be present before any row is looked at. Rows whose
/// three fields all come out empty are dropped.
pub fn ingest(table: &Table, sheet: &str, normalizer: &FilenameNormalizer) -> Result<Dataset> {
    let column = |name: &str| {
        table.column(name).ok_or_else(|| PipelineError::MissingColumn {
            column: name.to_string(),
            sheet: sheet.to_string(),
            found: table.headers.clone(),
        })
    };
    let surname_idx = column(COL_SURNAME)?;
    let full_name_idx = column(COL_FULL_NAME)?;
    let photo_idx = column(COL_PHOTO_FILE)?;

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = 0;
    for row in &table.rows {
        let record = PersonRecord {
            surname: table.cell(row, surname_idx).trim().to_string(),
            full_name: table.cell(row, full_name_idx).trim().to_string(),
            photo_file: normalizer.normalize(&table.cell(row, photo_idx)),
        };
        if record.is_empty() {
            dropped += 1;
            continue;
        }
        records.push(record);
    }
    debug!(kept = records.len(), dropped, "ingested spreadsheet rows");
    Ok(records)
}
