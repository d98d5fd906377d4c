//! Entry points for the two build steps. Both take their paths from
//! [`Settings`] so they can be pointed at a scratch directory.

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::export::write_json;
use crate::extract::parse_people_js;
use crate::ingest::ingest;
use crate::jsdata::write_js;
use crate::normalize::FilenameNormalizer;
use crate::record::Dataset;
use crate::settings::Settings;
use crate::sheet::{read_sheet, Table};
use crate::thumbs::{reconcile, ImageTool, ReconcileReport};

#[derive(Debug)]
pub struct PeopleJsSummary {
    pub records: usize,
    pub output: PathBuf,
    /// `None` when thumbnail generation was switched off.
    pub thumbnails: Option<ReconcileReport>,
}

/// Spreadsheet -> `people-data.js`, then thumbnails.
pub fn run_people_js(
    settings: &Settings,
    tool: &dyn ImageTool,
    thumbnails: bool,
) -> Result<PeopleJsSummary> {
    let input = settings.input_sheet_path();
    info!(input = %input.display(), "reading spreadsheet");
    let table = read_sheet(&input, settings.sheet_name.as_deref())?;
    build_people_js(settings, &table, tool, thumbnails)
}

pub fn build_people_js(
    settings: &Settings,
    table: &Table,
    tool: &dyn ImageTool,
    thumbnails: bool,
) -> Result<PeopleJsSummary> {
    let sheet = settings
        .input_sheet
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| settings.input_sheet.display().to_string());
    let normalizer = FilenameNormalizer::from_settings(settings);
    let records = ingest(table, &sheet, &normalizer)?;

    let output = settings.output_js_path();
    write_js(&output, &settings.binding, &records)?;
    info!(records = records.len(), output = %output.display(), "wrote JS data");

    let thumbnails = if thumbnails {
        Some(reconcile(&records, settings, tool)?)
    } else {
        None
    };

    Ok(PeopleJsSummary {
        records: records.len(),
        output,
        thumbnails,
    })
}

/// Reads the JS data file and returns its validated entries.
pub fn load_people_js(settings: &Settings) -> Result<Vec<Value>> {
    let path = settings.output_js_path();
    if !path.exists() {
        return Err(PipelineError::InputMissing(path));
    }
    let bytes = fs::read(&path).map_err(|e| PipelineError::io(&path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    parse_people_js(&text, &settings.binding, settings.validate_sample)
}

/// `people-data.js` -> `people-index.json`. Returns the number of entries.
pub fn run_people_index(settings: &Settings) -> Result<usize> {
    let entries = load_people_js(settings)?;
    let output = settings.output_json_path();
    let written = write_json(&output, &entries)?;
    info!(entries = written, output = %output.display(), "wrote JSON index");
    Ok(written)
}

/// Typed view of parsed entries; fails on any entry that is not a record.
pub fn records_from_values(values: Vec<Value>) -> Result<Dataset> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(PipelineError::from))
        .collect()
}
