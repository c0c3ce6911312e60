//! Error types for Surefire report ingestion.

use std::path::PathBuf;

use sensor_xml::XmlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurefireError {
    /// A report file could not be read or parsed. Fatal for that file only.
    #[error("failed to parse the Surefire report {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: XmlError,
    },
}

impl SurefireError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            SurefireError::Parse { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, SurefireError>;
