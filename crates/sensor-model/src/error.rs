use std::path::PathBuf;

use thiserror::Error;

use crate::metric::Metric;

/// A sink rejected a measurement or an issue.
///
/// This is the only failure sensors recover from while persisting: it is
/// logged and processing moves on to the next value.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("resource '{resource}' is not known to the project")]
    UnknownResource { resource: String },

    #[error("measure {metric} already saved on '{resource}'")]
    DuplicateMeasure { resource: String, metric: Metric },

    #[error("rejected by sink: {message}")]
    Rejected { message: String },
}

/// Errors raised while loading sensor settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid property override '{value}', expected KEY=VALUE")]
    InvalidOverride { value: String },
}
