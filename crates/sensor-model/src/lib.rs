//! Data model shared by the report sensors.
//!
//! This crate holds the unit test aggregates (results, per-class reports and
//! the run index), static-analysis violations and issues, the opaque resource
//! handles produced by the host project, and the narrow interfaces through
//! which the sensors talk to the host: file lookup, measurement persistence
//! and issue recording.

pub mod error;
pub mod index;
pub mod metric;
pub mod ports;
pub mod report;
pub mod resource;
pub mod result;
pub mod settings;
pub mod violation;

pub use error::{PersistError, SettingsError};
pub use index::{NESTING_SEPARATOR, UnitTestIndex, parent_class_name};
pub use metric::{MeasureValue, Metric};
pub use ports::{InputFileSystem, IssueRecorder, IssueSink, MeasurementSink, ProjectContext};
pub use report::UnitTestClassReport;
pub use resource::{ResourceHandle, ResourceKind};
pub use result::{TestStatus, UnitTestResult};
pub use settings::Settings;
pub use violation::{Issue, RuleKey, Violation};

/// Language key of Objective-C sources in the host project.
pub const OBJC_LANGUAGE_KEY: &str = "objc";
