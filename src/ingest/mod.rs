// Raw record ingestion: CSV loaders for the four record families deposited
// by the external scraper, plus the read-only reference tables. Everything
// downstream of this module works on typed records; scraping itself is not
// this crate's concern.

pub mod batting;
pub mod fielding;
pub mod pitching;
pub mod reference;
pub mod standings;

use std::path::Path;

/// Errors common to all raw-file loaders.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

pub(crate) fn open_file(path: &Path) -> Result<std::fs::File, IngestError> {
    std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

pub(crate) fn csv_error(path: &Path, e: csv::Error) -> IngestError {
    IngestError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}
