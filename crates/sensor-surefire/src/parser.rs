//! Run-level driver: locate, parse, sanitize and save.

use std::path::Path;

use sensor_model::{MeasureValue, MeasurementSink, Metric, ProjectContext, UnitTestIndex};
use sensor_xml::StaxParser;
use tracing::{Level, debug, enabled, error, info, info_span, warn};

use crate::dump;
use crate::error::{Result, SurefireError};
use crate::handler::SurefireStaxHandler;
use crate::locator::find_reports;
use crate::reconcile::{SaveSummary, sanitize, save};
use crate::resolver::UnitTestResourceResolver;

/// Parses one report file into a fresh index.
///
/// Nothing is returned for a file that fails part way, so a caller folding
/// the result into its own index never sees partial data.
pub fn parse_report(path: &Path) -> Result<UnitTestIndex> {
    let mut index = UnitTestIndex::new();
    StaxParser::new(SurefireStaxHandler::new(&mut index))
        .parse_path(path)
        .map_err(|source| SurefireError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(index)
}

/// What a collection run did.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    pub report_files: usize,
    pub parsed_files: usize,
    /// Files that could not be parsed. Each one is also logged.
    pub failures: Vec<SurefireError>,
    pub saved: SaveSummary,
    /// True when no report was found and a zero test count was saved on the
    /// project instead.
    pub recorded_zero_tests: bool,
}

/// Collects the Surefire reports of one directory into test measures.
pub struct SurefireParser<'r, R: ?Sized> {
    resolver: &'r R,
}

impl<'r, R: UnitTestResourceResolver + ?Sized> SurefireParser<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self { resolver }
    }

    pub fn collect<S>(&self, project: &ProjectContext, reports_dir: &Path, sink: &mut S) -> CollectOutcome
    where
        S: MeasurementSink + ?Sized,
    {
        let reports = find_reports(reports_dir);
        let mut outcome = CollectOutcome {
            report_files: reports.len(),
            ..CollectOutcome::default()
        };

        if reports.is_empty() {
            info!(dir = %reports_dir.display(), "no Surefire report found");
            if !project.has_modules() {
                outcome.recorded_zero_tests = save_zero_tests(project, sink);
            }
            return outcome;
        }

        let mut index = UnitTestIndex::new();
        for path in &reports {
            let _span = info_span!("surefire_report", path = %path.display()).entered();
            match parse_report(path) {
                Ok(parsed) => {
                    debug!(classes = parsed.len(), "parsed report");
                    index.absorb(parsed);
                    outcome.parsed_files += 1;
                }
                Err(failure) => {
                    error!(error = %failure, "skipping unreadable Surefire report");
                    outcome.failures.push(failure);
                }
            }
        }

        log_index("parsed reports", &index);
        let merged = sanitize(&mut index);
        if merged > 0 {
            log_index("sanitized reports", &index);
        }

        outcome.saved = save(&index, self.resolver, sink);
        info!(
            files = outcome.parsed_files,
            failed = outcome.failures.len(),
            classes = outcome.saved.saved_classes,
            unresolved = outcome.saved.unresolved_classes,
            "Surefire reports collected"
        );
        outcome
    }
}

fn save_zero_tests<S>(project: &ProjectContext, sink: &mut S) -> bool
where
    S: MeasurementSink + ?Sized,
{
    match sink.persist(&project.handle, Metric::Tests, MeasureValue::Number(0.0)) {
        Ok(()) => true,
        Err(source) => {
            warn!(project = %project.handle, error = %source, "could not save zero test count");
            false
        }
    }
}

fn log_index(label: &str, index: &UnitTestIndex) {
    if !enabled!(Level::DEBUG) {
        return;
    }
    for (class_name, report) in index.iter() {
        match dump::to_xml(report) {
            Ok(details) => debug!(class = class_name, %details, "{label}"),
            Err(source) => debug!(class = class_name, error = %source, "{label}"),
        }
    }
}
