use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot find {}", .0.display())]
    InputMissing(PathBuf),
    #[error("column '{column}' not found in {sheet}. Found: {found:?}")]
    MissingColumn {
        column: String,
        sheet: String,
        found: Vec<String>,
    },
    #[error("could not read spreadsheet {}: {detail}", .path.display())]
    Sheet { path: PathBuf, detail: String },
    #[error("could not locate [ ... ] array (binding `{0}`)")]
    ArrayNotFound(String),
    #[error("could not parse array into JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("parsed data is not a list")]
    NotAList,
    #[error("entry {index} is not an object")]
    NotAnObject { index: usize },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("failed to thumbnail {file}: {detail}")]
    ToolFailed { file: String, detail: String },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}
