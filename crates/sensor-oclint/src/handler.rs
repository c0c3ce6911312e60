//! Stream handler for OCLint violation reports.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use sensor_model::{InputFileSystem, IssueRecorder, IssueSink, ResourceHandle, Violation};
use sensor_xml::{Element, Result, XmlCursor, XmlStreamHandler};
use tracing::{debug, error};

/// Repository that qualifies OCLint rule keys.
pub const REPOSITORY_KEY: &str = "OCLint";

const FILE: &str = "file";
const VIOLATION: &str = "violation";

/// Counters kept while streaming violation reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViolationStats {
    pub files: usize,
    pub unresolved_files: usize,
    pub violations: usize,
    pub recorded: usize,
    pub rejected: usize,
}

/// Records the violations of one report as issues on the project files.
///
/// ```xml
/// <oclint>
///   <file name="Classes/Foo.m">
///     <violation rule="long line" beginline="12" priority="3">Line with 120 characters</violation>
///   </file>
/// </oclint>
/// ```
///
/// Files that are not part of the project are skipped. A violation without a
/// valid `beginline` aborts the rest of the report.
pub struct OclintStaxHandler<'a, F: ?Sized, S: ?Sized> {
    files: &'a F,
    sink: &'a mut S,
    stats: ViolationStats,
}

impl<'a, F, S> OclintStaxHandler<'a, F, S>
where
    F: InputFileSystem + ?Sized,
    S: IssueSink + ?Sized,
{
    pub fn new(files: &'a F, sink: &'a mut S) -> Self {
        Self {
            files,
            sink,
            stats: ViolationStats::default(),
        }
    }

    pub fn stats(&self) -> ViolationStats {
        self.stats
    }

    /// Path of a reported file relative to the project base directory.
    fn relative_path(&self, reported: &str) -> PathBuf {
        let path = Path::new(reported);
        path.strip_prefix(self.files.base_dir())
            .unwrap_or(path)
            .to_path_buf()
    }

    fn stream_file<R: BufRead>(&mut self, cursor: &mut XmlCursor<R>, file: &Element) -> Result<()> {
        self.stats.files += 1;
        let name = file.attr("name").unwrap_or_default();
        let relative_path = self.relative_path(name);
        let Some(resource) = self.files.input_file(&relative_path) else {
            debug!(file = name, "reported file is not in the project, violations skipped");
            self.stats.unresolved_files += 1;
            return cursor.skip(file);
        };
        let Some(mut recorder) = self.sink.issuable(&resource) else {
            debug!(file = %resource, "file does not accept issues");
            return cursor.skip(file);
        };

        while let Some(element) = cursor.next_child_named(file, VIOLATION)? {
            let violation = read_violation(cursor, &element, name)?;
            self.stats.violations += 1;
            if record(recorder.as_mut(), &resource, &violation) {
                self.stats.recorded += 1;
            } else {
                self.stats.rejected += 1;
            }
        }
        Ok(())
    }
}

impl<F, S> XmlStreamHandler for OclintStaxHandler<'_, F, S>
where
    F: InputFileSystem + ?Sized,
    S: IssueSink + ?Sized,
{
    fn stream<R: BufRead>(&mut self, cursor: &mut XmlCursor<R>) -> Result<()> {
        let root = cursor.root()?;
        while let Some(file) = cursor.next_child_named(&root, FILE)? {
            self.stream_file(cursor, &file)?;
        }
        Ok(())
    }
}

fn read_violation<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    element: &Element,
    file: &str,
) -> Result<Violation> {
    let rule = element.require_attr("rule")?.to_string();
    let raw_line = element.require_attr("beginline")?;
    let line = raw_line
        .trim()
        .parse::<u32>()
        .map_err(|error| element.invalid_attr("beginline", raw_line, error))?;
    if line == 0 {
        return Err(element.invalid_attr("beginline", raw_line, "lines start at 1"));
    }
    let priority = element
        .attr("priority")
        .and_then(|value| value.trim().parse().ok());
    let message = cursor.text(element)?.trim().to_string();

    Ok(Violation {
        rule,
        line,
        message,
        file: file.to_string(),
        priority,
    })
}

fn record(recorder: &mut (dyn IssueRecorder + '_), resource: &ResourceHandle, violation: &Violation) -> bool {
    let issue = violation.to_issue(REPOSITORY_KEY);
    debug!(
        file = %resource,
        rule = %issue.rule,
        line = issue.line,
        priority = ?violation.priority,
        "recording issue"
    );
    match recorder.record(issue) {
        Ok(()) => true,
        Err(source) => {
            error!(file = %resource, error = %source, "could not save issue");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use sensor_model::{Issue, PersistError};
    use sensor_xml::{StaxParser, XmlError};

    use super::*;

    struct Tree {
        base_dir: PathBuf,
    }

    impl InputFileSystem for Tree {
        fn base_dir(&self) -> &Path {
            &self.base_dir
        }

        fn has_language(&self, _language: &str) -> bool {
            true
        }

        fn input_file(&self, relative_path: &Path) -> Option<ResourceHandle> {
            (relative_path == Path::new("Classes/Foo.m"))
                .then(|| ResourceHandle::file("Classes/Foo.m"))
        }

        fn input_file_matching(&self, _patterns: &[String]) -> Option<ResourceHandle> {
            None
        }
    }

    #[derive(Default)]
    struct Issues {
        recorded: Vec<Issue>,
    }

    struct Recorder<'a> {
        issues: &'a mut Vec<Issue>,
    }

    impl IssueRecorder for Recorder<'_> {
        fn record(&mut self, issue: Issue) -> std::result::Result<(), PersistError> {
            self.issues.push(issue);
            Ok(())
        }
    }

    impl IssueSink for Issues {
        fn issuable(&mut self, _resource: &ResourceHandle) -> Option<Box<dyn IssueRecorder + '_>> {
            Some(Box::new(Recorder {
                issues: &mut self.recorded,
            }))
        }
    }

    fn stream(xml: &str, issues: &mut Issues) -> std::result::Result<ViolationStats, XmlError> {
        let tree = Tree {
            base_dir: PathBuf::from("/work/app"),
        };
        let mut parser = StaxParser::new(OclintStaxHandler::new(&tree, issues));
        parser.parse_str(xml)?;
        Ok(parser.handler().stats())
    }

    #[test]
    fn violations_become_issues() {
        let mut issues = Issues::default();
        let stats = stream(
            r#"<oclint version="0.7">
                 <file name="/work/app/Classes/Foo.m">
                   <violation rule="long line" beginline="12" priority="3">  Line too long  </violation>
                   <violation rule="unused local variable" beginline="40">Unused 'x'</violation>
                 </file>
               </oclint>"#,
            &mut issues,
        )
        .unwrap();

        assert_eq!(stats.recorded, 2);
        assert_eq!(issues.recorded[0].rule.to_string(), "OCLint:long line");
        assert_eq!(issues.recorded[0].line, 12);
        assert_eq!(issues.recorded[0].message, "Line too long");
        assert_eq!(issues.recorded[1].line, 40);
    }

    #[test]
    fn unknown_files_are_skipped() {
        let mut issues = Issues::default();
        let stats = stream(
            r#"<oclint>
                 <file name="Vendor/Lib.m"><violation rule="r" beginline="not a line">m</violation></file>
                 <file name="Classes/Foo.m"><violation rule="r" beginline="1">m</violation></file>
               </oclint>"#,
            &mut issues,
        )
        .unwrap();

        assert_eq!(stats.files, 2);
        assert_eq!(stats.unresolved_files, 1);
        assert_eq!(issues.recorded.len(), 1);
    }

    #[test]
    fn line_zero_is_invalid() {
        let mut issues = Issues::default();
        let error = stream(
            r#"<oclint><file name="Classes/Foo.m"><violation rule="r" beginline="0">m</violation></file></oclint>"#,
            &mut issues,
        )
        .unwrap_err();
        assert!(matches!(error, XmlError::InvalidAttribute { .. }));
    }

    #[test]
    fn missing_line_is_an_error() {
        let mut issues = Issues::default();
        let error = stream(
            r#"<oclint><file name="Classes/Foo.m"><violation rule="r">m</violation></file></oclint>"#,
            &mut issues,
        )
        .unwrap_err();
        assert!(matches!(error, XmlError::MissingAttribute { .. }));
    }
}
