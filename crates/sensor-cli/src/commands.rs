use std::path::PathBuf;

use anyhow::Result;
use sensor_cli::analysis::{AnalysisResult, analyse_project, discover_reports, load_settings};
use tracing::info;

use crate::cli::{AnalyseArgs, SettingsArgs};

pub fn run_analyse(args: &AnalyseArgs) -> Result<AnalysisResult> {
    let settings = load_settings(
        &args.settings.project_dir,
        args.settings.settings.as_deref(),
        &args.settings.defines,
    )?;
    let result = analyse_project(&args.settings.project_dir, &settings)?;
    if let Some(output) = &args.output {
        result.store.write_json(result.project.handle.key(), output)?;
        info!(path = %output.display(), "measures written");
    }
    Ok(result)
}

pub fn run_reports(args: &SettingsArgs) -> Result<Vec<(String, PathBuf)>> {
    let settings = load_settings(&args.project_dir, args.settings.as_deref(), &args.defines)?;
    discover_reports(&args.project_dir, &settings)
}
