use serde::Serialize;

use crate::result::{TestStatus, UnitTestResult};

/// Aggregate of every result reported for one class across all parsed
/// report files.
///
/// Only the results are stored; every count is derived from them, so
/// `tests() == results().len()` holds after any sequence of adds and merges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitTestClassReport {
    results: Vec<UnitTestResult>,
}

impl UnitTestClassReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_results(results: Vec<UnitTestResult>) -> Self {
        Self { results }
    }

    pub fn add(&mut self, result: UnitTestResult) -> &mut Self {
        self.results.push(result);
        self
    }

    /// Absorbs another report, appending its results after ours.
    pub fn absorb(&mut self, other: UnitTestClassReport) -> &mut Self {
        self.results.extend(other.results);
        self
    }

    pub fn results(&self) -> &[UnitTestResult] {
        &self.results
    }

    pub fn tests(&self) -> usize {
        self.results.len()
    }

    pub fn skipped(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    pub fn failures(&self) -> usize {
        self.count(TestStatus::Failure)
    }

    pub fn errors(&self) -> usize {
        self.count(TestStatus::Error)
    }

    pub fn duration_milliseconds(&self) -> u64 {
        self.results
            .iter()
            .map(UnitTestResult::duration_milliseconds)
            .fold(0, u64::saturating_add)
    }

    fn count(&self, status: TestStatus) -> usize {
        self.results
            .iter()
            .filter(|result| result.status() == status)
            .count()
    }
}
