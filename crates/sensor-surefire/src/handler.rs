//! Stream handler for Surefire-style XML reports.

use std::io::BufRead;

use sensor_model::{NESTING_SEPARATOR, TestStatus, UnitTestIndex, UnitTestResult};
use sensor_xml::{Element, Result, XmlCursor, XmlStreamHandler};
use tracing::debug;

const TESTSUITE: &str = "testsuite";
const TESTCASE: &str = "testcase";

/// Adds the test cases of one report document to an index.
///
/// Suites are looked up at any depth, so both a bare `<testsuite>` root and a
/// `<testsuites>` wrapper are accepted. Each `<testcase>` is filed under its
/// `classname`, or under the suite name when the test case has none.
pub struct SurefireStaxHandler<'a> {
    index: &'a mut UnitTestIndex,
}

impl<'a> SurefireStaxHandler<'a> {
    pub fn new(index: &'a mut UnitTestIndex) -> Self {
        Self { index }
    }

    fn stream_suite<R: BufRead>(&mut self, cursor: &mut XmlCursor<R>, suite: &Element) -> Result<()> {
        let suite_name = suite.attr("name").unwrap_or_default().to_string();
        if suite_name.contains(NESTING_SEPARATOR) {
            debug!(suite = %suite_name, "skipping test suite of a nested class");
            return cursor.skip(suite);
        }
        while let Some(test_case) = cursor.next_child_named(suite, TESTCASE)? {
            let class_name = owning_class_name(&test_case, &suite_name);
            let result = parse_test_case(cursor, &test_case)?;
            self.index.record_for(&class_name).add(result);
        }
        Ok(())
    }
}

impl XmlStreamHandler for SurefireStaxHandler<'_> {
    fn stream<R: BufRead>(&mut self, cursor: &mut XmlCursor<R>) -> Result<()> {
        let root = cursor.root()?;
        if root.name() == TESTSUITE {
            return self.stream_suite(cursor, &root);
        }
        while let Some(suite) = cursor.next_descendant_named(&root, TESTSUITE)? {
            self.stream_suite(cursor, &suite)?;
        }
        Ok(())
    }
}

/// Class a test case belongs to: its `classname` without any trailing
/// parameter list, falling back to the enclosing suite name.
fn owning_class_name(test_case: &Element, suite_name: &str) -> String {
    let class_name = test_case.attr("classname").unwrap_or_default().trim();
    let class_name = match class_name.find('(') {
        Some(open) if class_name.ends_with(')') => class_name[..open].trim(),
        _ => class_name,
    };
    if class_name.is_empty() {
        suite_name.to_string()
    } else {
        class_name.to_string()
    }
}

/// Test name, prefixed with the nested class part for nested classes
/// (`Outer$Inner` + `testA` gives `Inner/testA`).
fn test_case_name(test_case: &Element) -> String {
    let name = test_case.attr("name").unwrap_or_default();
    match test_case
        .attr("classname")
        .and_then(|class_name| class_name.split_once(NESTING_SEPARATOR))
    {
        Some((_, nested)) => format!("{nested}/{name}"),
        None => name.to_string(),
    }
}

fn parse_test_case<R: BufRead>(cursor: &mut XmlCursor<R>, test_case: &Element) -> Result<UnitTestResult> {
    let name = test_case_name(test_case);
    let mut duration = time_attribute_in_ms(test_case)?;
    let mut status = TestStatus::Success;
    let mut message = None;
    let mut stack_trace = None;

    while let Some(child) = cursor.next_child(test_case)? {
        match child.name() {
            "skipped" => {
                status = TestStatus::Skipped;
                // Surefire reports the setup time of skipped tests.
                duration = 0;
            }
            "failure" | "error" => {
                status = if child.name() == "failure" {
                    TestStatus::Failure
                } else {
                    TestStatus::Error
                };
                message = child.attr("message").map(str::to_string);
                let text = cursor.text(&child)?;
                stack_trace = Some(text).filter(|text| !text.trim().is_empty());
            }
            _ => continue,
        }
        break;
    }
    cursor.skip(test_case)?;

    Ok(UnitTestResult::new(name, status, duration)
        .with_message(message)
        .with_stack_trace(stack_trace))
}

/// Reads the `time` attribute (seconds, English number format) as whole
/// milliseconds. A missing or NaN time counts as zero. Infinite, negative
/// and too large times are rejected.
fn time_attribute_in_ms(test_case: &Element) -> Result<u64> {
    let Some(raw) = test_case.attr("time") else {
        return Ok(0);
    };
    let normalized: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if normalized.is_empty() {
        return Ok(0);
    }
    let seconds = normalized
        .parse::<f64>()
        .map_err(|error| test_case.invalid_attr("time", raw, error))?;
    if seconds.is_nan() {
        return Ok(0);
    }
    let milliseconds = (seconds * 1000.0).trunc();
    if !milliseconds.is_finite() || milliseconds < 0.0 || milliseconds >= u64::MAX as f64 {
        return Err(test_case.invalid_attr("time", raw, "duration out of range"));
    }
    Ok(milliseconds as u64)
}
