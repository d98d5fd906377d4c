use calamine::{open_workbook_auto, DataType, Reader};
use std::path::Path;

use crate::error::{PipelineError, Result};

/// A header row plus data rows, every cell already coerced to a string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Test/fixture helper: build from string literals.
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Self {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Short rows are padded with empty cells.
    pub fn cell(&self, row: &[String], idx: usize) -> String {
        row.get(idx).cloned().unwrap_or_default()
    }
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.clone(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Reads one sheet (named, or the first) of an .ods/.xlsx/.xls workbook.
pub fn read_sheet(path: &Path, sheet_name: Option<&str>) -> Result<Table> {
    if !path.exists() {
        return Err(PipelineError::InputMissing(path.to_path_buf()));
    }
    let sheet_err = |detail: String| PipelineError::Sheet {
        path: path.to_path_buf(),
        detail,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| sheet_err(e.to_string()))?;
    let range = match sheet_name {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    }
    .ok_or_else(|| sheet_err(format!("sheet {:?} not found", sheet_name.unwrap_or("#0"))))?
    .map_err(|e| sheet_err(e.to_string()))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|r| r.iter().map(|c| cell_to_string(c).trim().to_string()).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|r| r.iter().map(cell_to_string).collect())
        .collect();

    Ok(Table { headers, rows })
}
