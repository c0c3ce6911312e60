//! One analysis run: both sensors over one project tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sensor_model::{InputFileSystem, ProjectContext, Settings};
use sensor_oclint::OclintSensor;
use sensor_surefire::SurefireSensor;
use tracing::{info, info_span, warn};

use crate::project::ProjectTree;
use crate::store::MeasureStore;

/// Name of the optional settings file read from the project directory.
pub const SETTINGS_FILE: &str = "sensor.toml";

/// Per-sensor outcome of a run.
#[derive(Debug, Default)]
pub struct SensorReport {
    pub name: String,
    pub executed: bool,
    pub report_files: usize,
    pub parsed_files: usize,
    /// Failed report files, rendered for display.
    pub failures: Vec<String>,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct AnalysisResult {
    pub project: ProjectContext,
    pub sensors: Vec<SensorReport>,
    pub store: MeasureStore,
}

impl AnalysisResult {
    pub fn has_failures(&self) -> bool {
        self.sensors.iter().any(|sensor| !sensor.failures.is_empty())
    }
}

/// Settings of a project: `sensor.toml` from the project directory (or an
/// explicit file), then `KEY=VALUE` overrides.
pub fn load_settings(project_dir: &Path, file: Option<&Path>, overrides: &[String]) -> Result<Settings> {
    let default_file = project_dir.join(SETTINGS_FILE);
    let path: Option<PathBuf> = match file {
        Some(path) => Some(path.to_path_buf()),
        None => default_file.is_file().then_some(default_file),
    };
    let mut settings = match &path {
        Some(path) => Settings::load(path)?,
        None => Settings::new(),
    };
    settings
        .apply_overrides(overrides)
        .context("apply property overrides")?;
    Ok(settings)
}

/// Runs the Surefire and OCLint sensors over the project at `project_dir`.
pub fn analyse_project(project_dir: &Path, settings: &Settings) -> Result<AnalysisResult> {
    let tree = ProjectTree::scan(project_dir)
        .with_context(|| format!("index project {}", project_dir.display()))?;
    let project = tree.context(settings);
    let _span = info_span!("analyse", project = %project.handle).entered();
    let mut store = MeasureStore::new();
    let mut sensors = Vec::new();

    let surefire = SurefireSensor::new(&tree, settings);
    let mut report = SensorReport {
        name: surefire.to_string(),
        ..SensorReport::default()
    };
    if surefire.should_execute_on_project(&project) {
        let outcome = surefire.analyse(&project, &mut store);
        report.executed = true;
        report.report_files = outcome.report_files;
        report.parsed_files = outcome.parsed_files;
        report.failures = outcome.failures.iter().map(ToString::to_string).collect();
    } else {
        warn!(sensor = %surefire, "skipped: no Objective-C sources or not the root project");
    }
    sensors.push(report);

    let oclint = OclintSensor::new(&tree, settings);
    let mut report = SensorReport {
        name: oclint.to_string(),
        ..SensorReport::default()
    };
    if oclint.should_execute_on_project(&project) {
        let outcome = oclint.analyse(&mut store);
        report.executed = true;
        report.report_files = outcome.report_files;
        report.parsed_files = outcome.parsed_files;
        report.failures = outcome.failures.iter().map(ToString::to_string).collect();
    } else {
        warn!(sensor = %oclint, "skipped: no Objective-C sources or not the root project");
    }
    sensors.push(report);

    info!(
        resources = store.resources().count(),
        issues = store.issue_count(),
        "analysis finished"
    );
    Ok(AnalysisResult {
        project,
        sensors,
        store,
    })
}

/// Report files each sensor would read, labelled by sensor.
pub fn discover_reports(project_dir: &Path, settings: &Settings) -> Result<Vec<(String, PathBuf)>> {
    let tree = ProjectTree::scan(project_dir)
        .with_context(|| format!("index project {}", project_dir.display()))?;
    let surefire = SurefireSensor::new(&tree, settings);
    let oclint = OclintSensor::new(&tree, settings);

    let mut reports: Vec<(String, PathBuf)> = sensor_surefire::find_reports(&surefire.reports_dir())
        .into_iter()
        .map(|path| (surefire.to_string(), path))
        .collect();
    reports.extend(oclint.reports().into_iter().map(|path| (oclint.to_string(), path)));
    for (_, path) in &mut reports {
        if let Ok(relative) = path.strip_prefix(tree.base_dir()) {
            *path = relative.to_path_buf();
        }
    }
    Ok(reports)
}
