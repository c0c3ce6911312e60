use std::fmt;
use std::path::PathBuf;

use sensor_model::{InputFileSystem, MeasurementSink, OBJC_LANGUAGE_KEY, ProjectContext, Settings};
use tracing::info_span;

use crate::parser::{CollectOutcome, SurefireParser};
use crate::resolver::ClassFileResolver;

/// Settings key of the reports directory.
pub const REPORT_PATH_KEY: &str = "sonar.junit.reportsPath";

/// Reports directory used when the setting is absent.
pub const DEFAULT_REPORT_PATH: &str = "sonar-reports/";

/// Saves unit test measures on the Objective-C test files of a project.
pub struct SurefireSensor<'a, F: ?Sized> {
    files: &'a F,
    settings: &'a Settings,
}

impl<'a, F: InputFileSystem + ?Sized> SurefireSensor<'a, F> {
    pub fn new(files: &'a F, settings: &'a Settings) -> Self {
        Self { files, settings }
    }

    /// Runs on the root project only, and only if it has Objective-C sources.
    pub fn should_execute_on_project(&self, project: &ProjectContext) -> bool {
        project.is_root && self.files.has_language(OBJC_LANGUAGE_KEY)
    }

    /// Reports directory, relative paths taken from the project base directory.
    pub fn reports_dir(&self) -> PathBuf {
        let configured = self
            .settings
            .get_string(REPORT_PATH_KEY)
            .unwrap_or(DEFAULT_REPORT_PATH);
        self.files.base_dir().join(configured)
    }

    pub fn analyse<S>(&self, project: &ProjectContext, sink: &mut S) -> CollectOutcome
    where
        S: MeasurementSink + ?Sized,
    {
        let reports_dir = self.reports_dir();
        let _span = info_span!("surefire", dir = %reports_dir.display()).entered();
        let resolver = ClassFileResolver::new(self.files);
        SurefireParser::new(&resolver).collect(project, &reports_dir, sink)
    }
}

impl<F: ?Sized> fmt::Display for SurefireSensor<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Objective-C SurefireSensor")
    }
}
