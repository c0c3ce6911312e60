//! Streaming XML reading for report sensors.
//!
//! Reports are walked with a forward-only [`XmlCursor`]: a handler asks for
//! the root element, then for the children (or named descendants) of any
//! element it holds, and reads element text on demand. Nothing beyond the
//! current event is buffered, and the document is never validated against a
//! schema. A syntax error anywhere surfaces as a single [`XmlError`] for the
//! whole document.

mod cursor;
mod error;
mod parser;

pub use cursor::{Element, XmlCursor};
pub use error::{Result, XmlError};
pub use parser::{StaxParser, XmlStreamHandler};
