use std::fmt;

use serde::Serialize;

/// Measurements produced by the test sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Tests,
    SkippedTests,
    TestErrors,
    TestFailures,
    TestExecutionTime,
    TestSuccessDensity,
    TestData,
}

impl Metric {
    pub fn key(self) -> &'static str {
        match self {
            Metric::Tests => "tests",
            Metric::SkippedTests => "skipped_tests",
            Metric::TestErrors => "test_errors",
            Metric::TestFailures => "test_failures",
            Metric::TestExecutionTime => "test_execution_time",
            Metric::TestSuccessDensity => "test_success_density",
            Metric::TestData => "test_data",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Tests => "Unit tests",
            Metric::SkippedTests => "Skipped unit tests",
            Metric::TestErrors => "Unit test errors",
            Metric::TestFailures => "Unit test failures",
            Metric::TestExecutionTime => "Unit tests duration",
            Metric::TestSuccessDensity => "Unit test success (%)",
            Metric::TestData => "Unit test details",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Value of a persisted measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeasureValue {
    Number(f64),
    Text(String),
}

impl MeasureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MeasureValue::Number(value) => Some(*value),
            MeasureValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MeasureValue::Text(value) => Some(value),
            MeasureValue::Number(_) => None,
        }
    }
}

impl From<f64> for MeasureValue {
    fn from(value: f64) -> Self {
        MeasureValue::Number(value)
    }
}

impl From<String> for MeasureValue {
    fn from(value: String) -> Self {
        MeasureValue::Text(value)
    }
}
