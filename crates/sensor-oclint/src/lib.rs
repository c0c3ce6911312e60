//! OCLint violation report sensor.
//!
//! Report files are selected with an Ant-style pattern relative to the
//! project base directory, then streamed one by one. Every `<violation>`
//! under a `<file>` that belongs to the project becomes an issue keyed by the
//! `OCLint` rule repository. A malformed report stops at the first bad
//! violation; the other reports are still read.

mod error;
mod handler;
mod locator;
mod parser;
mod sensor;

pub use error::{OclintError, Result};
pub use handler::{OclintStaxHandler, REPOSITORY_KEY, ViolationStats};
pub use locator::{ReportPattern, find_reports};
pub use parser::{CollectOutcome, OclintParser};
pub use sensor::{DEFAULT_REPORT_PATH, OclintSensor, REPORT_PATH_KEY};
