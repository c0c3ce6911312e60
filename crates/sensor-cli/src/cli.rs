//! CLI argument definitions for the report sensor host.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sensor_cli::logging::{LogConfig, LogFormat};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "sensor",
    version,
    about = "Attach Surefire test results and OCLint violations to Objective-C sources",
    long_about = "Read Surefire-style unit test reports and OCLint violation reports of a \
                  project,\nresolve them to the project's source files and summarize the \
                  resulting measures and issues."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// When to color tables and log lines.
    #[command(flatten)]
    pub color: Color,

    /// Level for the sensor crates; wins over -v/-q and RUST_LOG.
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log line layout.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs to this file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging setup for this invocation. An explicit `--log-level` beats
    /// `-v`/`-q`, and `RUST_LOG` is only consulted when neither is given.
    pub fn log_config(&self) -> LogConfig {
        let level_filter = self
            .log_level
            .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter,
            use_env_filter: self.log_level.is_none() && !self.verbosity.is_present(),
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Run both sensors over a project and print a summary.
    Analyse(AnalyseArgs),

    /// List the report files the sensors would read.
    Reports(SettingsArgs),
}

#[derive(Parser)]
pub struct SettingsArgs {
    /// Project base directory.
    #[arg(value_name = "PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Settings file (default: <PROJECT_DIR>/sensor.toml when present).
    #[arg(long = "settings", value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Override a setting, e.g. -D sonar.junit.reportsPath=build/reports.
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub defines: Vec<String>,
}

#[derive(Parser)]
pub struct AnalyseArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Write all measures and issues to this JSON file.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Values of `--log-level`.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Values of `--log-format`.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
