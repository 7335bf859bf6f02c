use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can abort an export. Nothing is retried: any variant ends the run.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("input graph file not found: {}", path.display())]
    InputNotFound { path: PathBuf },
    #[error("failure loading graph from {}: {reason}", path.display())]
    GraphLoad { path: PathBuf, reason: String },
    #[error("cannot convert {field} = {value} on {element} to {expected}")]
    TypeCoercion {
        element: String,
        field: String,
        value: String,
        expected: &'static str,
    },
    #[error("failure writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failure serializing graph document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid export configuration: {0}")]
    Config(String),
}

impl ExportError {
    pub fn graph_load(path: &Path, reason: impl Into<String>) -> Self {
        ExportError::GraphLoad {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
