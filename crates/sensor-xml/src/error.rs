use std::path::PathBuf;

use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Errors raised while streaming an XML document.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML at byte {position}: {source}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed attribute at byte {position}: {source}")]
    Attribute {
        position: u64,
        #[source]
        source: AttrError,
    },

    #[error("invalid character reference: {0}")]
    Escape(#[from] EscapeError),

    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("document has no root element")]
    NoRootElement,

    #[error("expected <{expected}> but found <{found}>")]
    UnexpectedElement { expected: String, found: String },

    #[error("unexpected {found} after the document element at byte {position}")]
    TrailingContent { position: u64, found: String },

    #[error("document ends inside <{element}>")]
    UnexpectedEof { element: String },

    #[error("missing attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    #[error("invalid {attribute}='{value}' on <{element}>: {reason}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, XmlError>;
