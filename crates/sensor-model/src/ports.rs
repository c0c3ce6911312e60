//! Interfaces to the host project.
//!
//! The sensors never touch the project model, the persistence layer or the
//! source tree directly. Everything goes through these traits so that the
//! reconciliation logic can run against an in-memory double in tests and
//! against the real project tree in the binary.

use std::path::{Path, PathBuf};

use crate::error::PersistError;
use crate::metric::{MeasureValue, Metric};
use crate::resource::ResourceHandle;
use crate::violation::Issue;

/// Lookup of project source files.
pub trait InputFileSystem {
    /// Project base directory; relative report paths are resolved from here.
    fn base_dir(&self) -> &Path;

    /// True when at least one source file of `language` is indexed.
    fn has_language(&self, language: &str) -> bool;

    /// File at exactly this path relative to the base directory.
    fn input_file(&self, relative_path: &Path) -> Option<ResourceHandle>;

    /// First file whose relative path matches any of the glob patterns.
    fn input_file_matching(&self, patterns: &[String]) -> Option<ResourceHandle>;
}

/// Destination of numeric and textual measurements.
pub trait MeasurementSink {
    fn persist(
        &mut self,
        resource: &ResourceHandle,
        metric: Metric,
        value: MeasureValue,
    ) -> Result<(), PersistError>;
}

/// Records issues on one resource.
pub trait IssueRecorder {
    fn record(&mut self, issue: Issue) -> Result<(), PersistError>;
}

/// Hands out issue recorders for resources that accept issues.
pub trait IssueSink {
    fn issuable(&mut self, resource: &ResourceHandle) -> Option<Box<dyn IssueRecorder + '_>>;
}

/// The parts of the host project model the sensors look at.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub handle: ResourceHandle,
    pub base_dir: PathBuf,
    pub is_root: bool,
    pub modules: Vec<String>,
}

impl ProjectContext {
    pub fn root(key: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            handle: ResourceHandle::project(key),
            base_dir: base_dir.into(),
            is_root: true,
            modules: Vec::new(),
        }
    }

    pub fn has_modules(&self) -> bool {
        !self.modules.is_empty()
    }
}
