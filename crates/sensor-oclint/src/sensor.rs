use std::fmt;
use std::path::PathBuf;

use sensor_model::{InputFileSystem, IssueSink, OBJC_LANGUAGE_KEY, ProjectContext, Settings};
use tracing::info_span;

use crate::locator::find_reports;
use crate::parser::{CollectOutcome, OclintParser};

/// Settings key of the report include pattern.
pub const REPORT_PATH_KEY: &str = "sonar.objectivec.oclint.report";

/// Report include pattern used when the setting is absent.
pub const DEFAULT_REPORT_PATH: &str = "sonar-reports/*oclint.xml";

/// Records OCLint violations as issues on Objective-C files.
pub struct OclintSensor<'a, F: ?Sized> {
    files: &'a F,
    settings: &'a Settings,
}

impl<'a, F: InputFileSystem + ?Sized> OclintSensor<'a, F> {
    pub fn new(files: &'a F, settings: &'a Settings) -> Self {
        Self { files, settings }
    }

    pub fn should_execute_on_project(&self, project: &ProjectContext) -> bool {
        project.is_root && self.files.has_language(OBJC_LANGUAGE_KEY)
    }

    pub fn report_pattern(&self) -> &str {
        self.settings
            .get_string(REPORT_PATH_KEY)
            .unwrap_or(DEFAULT_REPORT_PATH)
    }

    pub fn reports(&self) -> Vec<PathBuf> {
        find_reports(self.files.base_dir(), self.report_pattern())
    }

    pub fn analyse<S>(&self, sink: &mut S) -> CollectOutcome
    where
        S: IssueSink + ?Sized,
    {
        let _span = info_span!("oclint", pattern = self.report_pattern()).entered();
        OclintParser::new(self.files).collect(&self.reports(), sink)
    }
}

impl<F: ?Sized> fmt::Display for OclintSensor<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OCLintSensor")
    }
}
