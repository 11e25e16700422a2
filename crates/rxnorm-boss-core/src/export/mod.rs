//! Static HTML report export.

mod html;

pub use html::*;

use thiserror::Error;

/// Report export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot write report {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot encode report data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
