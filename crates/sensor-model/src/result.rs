use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    #[serde(rename = "ok")]
    Success,
    Skipped,
    Failure,
    Error,
}

impl TestStatus {
    /// Status label used in the test-data dump.
    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Success => "ok",
            TestStatus::Skipped => "skipped",
            TestStatus::Failure => "failure",
            TestStatus::Error => "error",
        }
    }

    /// True for failures and errors.
    pub fn is_unsuccessful(self) -> bool {
        matches!(self, TestStatus::Failure | TestStatus::Error)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ok" => Ok(TestStatus::Success),
            "skipped" => Ok(TestStatus::Skipped),
            "failure" => Ok(TestStatus::Failure),
            "error" => Ok(TestStatus::Error),
            other => Err(format!("unknown test status '{other}'")),
        }
    }
}

/// One test case outcome.
///
/// Results are immutable once built; the `with_*` methods consume the value
/// and are meant to be chained right after [`UnitTestResult::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTestResult {
    name: String,
    status: TestStatus,
    duration_milliseconds: u64,
    message: Option<String>,
    stack_trace: Option<String>,
}

impl UnitTestResult {
    pub fn new(name: impl Into<String>, status: TestStatus, duration_milliseconds: u64) -> Self {
        Self {
            name: name.into(),
            status,
            duration_milliseconds,
            message: None,
            stack_trace: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    #[must_use]
    pub fn with_stack_trace(mut self, stack_trace: Option<String>) -> Self {
        self.stack_trace = stack_trace;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn duration_milliseconds(&self) -> u64 {
        self.duration_milliseconds
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }
}
