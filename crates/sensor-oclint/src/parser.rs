//! Run-level driver over violation report files.

use std::path::{Path, PathBuf};

use sensor_model::{InputFileSystem, IssueSink};
use sensor_xml::StaxParser;
use tracing::{error, info, info_span};

use crate::error::{OclintError, Result};
use crate::handler::{OclintStaxHandler, ViolationStats};

/// What a collection run did.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    pub report_files: usize,
    pub parsed_files: usize,
    /// Reports that failed part way. Issues read before the failure stay
    /// recorded.
    pub failures: Vec<OclintError>,
    pub stats: ViolationStats,
}

/// Records the issues of OCLint reports on the project files.
pub struct OclintParser<'a, F: ?Sized> {
    files: &'a F,
}

impl<'a, F: InputFileSystem + ?Sized> OclintParser<'a, F> {
    pub fn new(files: &'a F) -> Self {
        Self { files }
    }

    /// Streams one report into `sink`.
    pub fn parse_report<S>(&self, path: &Path, sink: &mut S) -> Result<ViolationStats>
    where
        S: IssueSink + ?Sized,
    {
        let mut parser = StaxParser::new(OclintStaxHandler::new(self.files, sink));
        let parsed = parser.parse_path(path);
        let stats = parser.handler().stats();
        parsed.map_err(|source| OclintError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(stats)
    }

    /// Streams every report; a failing report does not stop the next one.
    pub fn collect<S>(&self, reports: &[PathBuf], sink: &mut S) -> CollectOutcome
    where
        S: IssueSink + ?Sized,
    {
        let mut outcome = CollectOutcome {
            report_files: reports.len(),
            ..CollectOutcome::default()
        };
        for path in reports {
            let _span = info_span!("oclint_report", path = %path.display()).entered();
            match self.parse_report(path, sink) {
                Ok(stats) => {
                    outcome.parsed_files += 1;
                    add(&mut outcome.stats, stats);
                }
                Err(failure) => {
                    error!(error = %failure, "skipping rest of OCLint report");
                    outcome.failures.push(failure);
                }
            }
        }
        info!(
            files = outcome.parsed_files,
            failed = outcome.failures.len(),
            issues = outcome.stats.recorded,
            "OCLint reports collected"
        );
        outcome
    }
}

fn add(total: &mut ViolationStats, stats: ViolationStats) {
    total.files += stats.files;
    total.unresolved_files += stats.unresolved_files;
    total.violations += stats.violations;
    total.recorded += stats.recorded;
    total.rejected += stats.rejected;
}
