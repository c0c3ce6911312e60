//! Nested class folding and persistence of per-class test measures.

use sensor_model::{
    MeasureValue, MeasurementSink, Metric, ResourceHandle, UnitTestClassReport, UnitTestIndex,
    parent_class_name,
};
use tracing::{debug, error};

use crate::dump;
use crate::resolver::UnitTestResourceResolver;

/// Folds every nested class (`Outer$Inner`) into its enclosing class.
///
/// Returns the number of entries merged away.
pub fn sanitize(index: &mut UnitTestIndex) -> usize {
    let mut merged = 0;
    for class_name in index.class_names() {
        if let Some(parent) = parent_class_name(&class_name) {
            debug!(class = %class_name, parent, "folding nested class into parent");
            index.merge(&class_name, parent);
            merged += 1;
        }
    }
    merged
}

/// Rounds a percentage to one decimal place, halves away from zero.
pub fn scale_value(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Measures derived from one class report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestMeasures {
    pub skipped: usize,
    /// Executed tests: every test that was not skipped.
    pub tests: usize,
    pub errors: usize,
    pub failures: usize,
    pub duration_ms: u64,
    /// Share of executed tests that neither failed nor errored, absent when
    /// nothing was executed.
    pub success_density: Option<f64>,
}

impl TestMeasures {
    pub fn from_report(report: &UnitTestClassReport) -> Self {
        let skipped = report.skipped();
        let tests = report.tests() - skipped;
        let errors = report.errors();
        let failures = report.failures();
        let success_density = (tests > 0).then(|| {
            let passed = tests.saturating_sub(errors + failures);
            scale_value(passed as f64 * 100.0 / tests as f64)
        });
        Self {
            skipped,
            tests,
            errors,
            failures,
            duration_ms: report.duration_milliseconds(),
            success_density,
        }
    }
}

/// Outcome of [`save`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub saved_classes: usize,
    pub unresolved_classes: usize,
    pub rejected_measures: usize,
}

/// Persists the measures of every class with at least one test.
///
/// Classes that do not resolve to a resource are skipped. A measure the sink
/// rejects is logged and counted; the remaining measures and classes are
/// still saved.
pub fn save<R, S>(index: &UnitTestIndex, resolver: &R, sink: &mut S) -> SaveSummary
where
    R: UnitTestResourceResolver + ?Sized,
    S: MeasurementSink + ?Sized,
{
    let mut summary = SaveSummary::default();
    for (class_name, report) in index.iter() {
        if report.tests() == 0 {
            continue;
        }
        let Some(resource) = resolver.resolve(class_name) else {
            debug!(class = class_name, "test class not found in project, measures skipped");
            summary.unresolved_classes += 1;
            continue;
        };
        summary.rejected_measures += save_class_measures(&resource, report, sink);
        summary.saved_classes += 1;
    }
    summary
}

fn save_class_measures<S>(resource: &ResourceHandle, report: &UnitTestClassReport, sink: &mut S) -> usize
where
    S: MeasurementSink + ?Sized,
{
    let measures = TestMeasures::from_report(report);
    let mut values = vec![
        (Metric::SkippedTests, MeasureValue::from(measures.skipped as f64)),
        (Metric::Tests, MeasureValue::from(measures.tests as f64)),
        (Metric::TestErrors, MeasureValue::from(measures.errors as f64)),
        (Metric::TestFailures, MeasureValue::from(measures.failures as f64)),
        (Metric::TestExecutionTime, MeasureValue::from(measures.duration_ms as f64)),
    ];
    if let Some(density) = measures.success_density {
        values.push((Metric::TestSuccessDensity, MeasureValue::from(density)));
    }
    match dump::to_xml(report) {
        Ok(details) => values.push((Metric::TestData, MeasureValue::from(details))),
        Err(source) => error!(resource = %resource, error = %source, "cannot serialize test details"),
    }

    let mut rejected = 0;
    for (metric, value) in values {
        if !persist_measure(sink, resource, metric, value) {
            rejected += 1;
        }
    }
    rejected
}

/// Persists one measure. Returns `false` when the sink rejected it; NaN
/// values are dropped and count as persisted.
fn persist_measure<S>(sink: &mut S, resource: &ResourceHandle, metric: Metric, value: MeasureValue) -> bool
where
    S: MeasurementSink + ?Sized,
{
    if value.as_number().is_some_and(f64::is_nan) {
        debug!(resource = %resource, %metric, "skipping NaN measure");
        return true;
    }
    match sink.persist(resource, metric, value) {
        Ok(()) => true,
        Err(source) => {
            error!(resource = %resource, %metric, error = %source, "could not save measure");
            false
        }
    }
}
