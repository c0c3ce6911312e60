//! Textual dump of a class report, persisted as the test-data measure.
//!
//! ```xml
//! <tests-details>
//!   <testcase status="ok" time="12" name="testA"/>
//!   <testcase status="failure" time="3" name="testB"><failure message="boom">stack</failure></testcase>
//! </tests-details>
//! ```
//!
//! The dump is written on a single line; the layout above is for reading.

use std::io::{self, BufRead};

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use sensor_model::{TestStatus, UnitTestClassReport, UnitTestResult};
use sensor_xml::{Element, StaxParser, XmlCursor, XmlError, XmlStreamHandler};

const TESTS_DETAILS: &str = "tests-details";
const TESTCASE: &str = "testcase";

/// Serializes a report to its test-data dump.
pub fn to_xml(report: &UnitTestClassReport) -> io::Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Start(BytesStart::new(TESTS_DETAILS)))?;
    for result in report.results() {
        write_result(&mut writer, result)?;
    }
    writer.write_event(Event::End(BytesEnd::new(TESTS_DETAILS)))?;
    String::from_utf8(writer.into_inner()).map_err(io::Error::other)
}

fn write_result<W: io::Write>(writer: &mut Writer<W>, result: &UnitTestResult) -> io::Result<()> {
    let duration = result.duration_milliseconds().to_string();
    let mut test_case = BytesStart::new(TESTCASE);
    test_case.push_attribute(("status", result.status().as_str()));
    test_case.push_attribute(("time", duration.as_str()));
    test_case.push_attribute(("name", result.name()));

    if !result.status().is_unsuccessful() {
        writer.write_event(Event::Empty(test_case))?;
        return Ok(());
    }

    let detail_name = result.status().as_str();
    let mut detail = BytesStart::new(detail_name);
    if let Some(message) = result.message() {
        detail.push_attribute(("message", message));
    }
    writer.write_event(Event::Start(test_case))?;
    writer.write_event(Event::Start(detail))?;
    if let Some(stack_trace) = result.stack_trace() {
        writer.write_event(Event::Text(BytesText::new(stack_trace)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(detail_name)))?;
    writer.write_event(Event::End(BytesEnd::new(TESTCASE)))?;
    Ok(())
}

/// Reads a test-data dump back into a report.
pub fn from_xml(text: &str) -> Result<UnitTestClassReport, XmlError> {
    let mut parser = StaxParser::new(DumpReader::default());
    parser.parse_str(text)?;
    Ok(parser.into_handler().report)
}

#[derive(Default)]
struct DumpReader {
    report: UnitTestClassReport,
}

impl XmlStreamHandler for DumpReader {
    fn stream<R: BufRead>(&mut self, cursor: &mut XmlCursor<R>) -> sensor_xml::Result<()> {
        let root = cursor.root()?;
        if root.name() != TESTS_DETAILS {
            return Err(XmlError::UnexpectedElement {
                expected: TESTS_DETAILS.to_string(),
                found: root.name().to_string(),
            });
        }
        while let Some(test_case) = cursor.next_child_named(&root, TESTCASE)? {
            let result = read_result(cursor, &test_case)?;
            self.report.add(result);
        }
        Ok(())
    }
}

fn read_result<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    test_case: &Element,
) -> sensor_xml::Result<UnitTestResult> {
    let raw_status = test_case.require_attr("status")?;
    let status: TestStatus = raw_status
        .parse()
        .map_err(|reason: String| test_case.invalid_attr("status", raw_status, reason))?;
    let duration = test_case.parse_attr::<u64>("time")?.unwrap_or(0);
    let name = test_case.attr("name").unwrap_or_default().to_string();

    let mut message = None;
    let mut stack_trace = None;
    if let Some(detail) = cursor.next_child(test_case)? {
        message = detail.attr("message").map(str::to_string);
        stack_trace = Some(cursor.text(&detail)?).filter(|text| !text.is_empty());
    }
    cursor.skip(test_case)?;

    Ok(UnitTestResult::new(name, status, duration)
        .with_message(message)
        .with_stack_trace(stack_trace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_lists_every_result() {
        let report = UnitTestClassReport::from_results(vec![
            UnitTestResult::new("testA", TestStatus::Success, 12),
            UnitTestResult::new("testB", TestStatus::Skipped, 0),
            UnitTestResult::new("testC", TestStatus::Failure, 3)
                .with_message(Some("a < b".to_string()))
                .with_stack_trace(Some("FooTests.m:7".to_string())),
        ]);

        let xml = to_xml(&report).unwrap();

        insta::assert_snapshot!(xml, @r#"<tests-details><testcase status="ok" time="12" name="testA"/><testcase status="skipped" time="0" name="testB"/><testcase status="failure" time="3" name="testC"><failure message="a &lt; b">FooTests.m:7</failure></testcase></tests-details>"#);
    }

    #[test]
    fn empty_report_dumps_empty_details() {
        let xml = to_xml(&UnitTestClassReport::new()).unwrap();
        assert_eq!(xml, "<tests-details></tests-details>");
    }

    #[test]
    fn reading_a_dump_recovers_counts() {
        let report = UnitTestClassReport::from_results(vec![
            UnitTestResult::new("ok", TestStatus::Success, 4),
            UnitTestResult::new("skip", TestStatus::Skipped, 0),
            UnitTestResult::new("fail", TestStatus::Failure, 5).with_message(Some("x".into())),
            UnitTestResult::new("err & more", TestStatus::Error, 6)
                .with_stack_trace(Some("trace <here>".into())),
        ]);

        let read = from_xml(&to_xml(&report).unwrap()).unwrap();

        assert_eq!(read.tests(), report.tests());
        assert_eq!(read.skipped(), 1);
        assert_eq!(read.failures(), 1);
        assert_eq!(read.errors(), 1);
        assert_eq!(read.duration_milliseconds(), 15);
        assert_eq!(read, report);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let error = from_xml(r#"<tests-details><testcase status="passed" time="1" name="t"/></tests-details>"#)
            .unwrap_err();
        assert!(matches!(error, XmlError::InvalidAttribute { .. }));
    }
}
