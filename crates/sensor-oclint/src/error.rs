//! Error types for OCLint report ingestion.

use std::path::{Path, PathBuf};

use sensor_xml::XmlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OclintError {
    /// A report file could not be read or parsed. Issues recorded from that
    /// file before the failure are kept.
    #[error("failed to parse the OCLint report {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: XmlError,
    },
}

impl OclintError {
    pub fn path(&self) -> &Path {
        match self {
            OclintError::Parse { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, OclintError>;
