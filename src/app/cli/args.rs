//! Core CLI arguments structure and basic functionality
//!
//! This module contains the Args struct definition and accessors that resolve
//! each setting to its effective value. Configuration loading and validation
//! live in sibling modules.

use crate::app::cli::display::ReportFormat;
use crate::broker::types::DEFAULT_BROKER_URL;
use crate::core::styles::palette_to_clap;
use crate::core::validation::validate_timeout_secs;
use crate::core::version::long_version;
use crate::lag::api::{ReportOrder, DEFAULT_BUDGET};
use clap::{CommandFactory, FromArgMatches, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Command-line options
///
/// Every value is optional so that configuration file values can fill the
/// gaps the command line leaves.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "streamlag")]
#[command(about = "Report JetStream consumer lag for one stream")]
#[command(version)]
pub struct Args {
    /// Broker URL (comma-separated for a cluster)
    #[arg(short = 'u', value_name = "URL")]
    pub short_url: Option<String>,

    /// Broker URL, takes precedence over -u
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Stream to report on
    #[arg(short = 's', long = "stream", value_name = "NAME")]
    pub stream: Option<String>,

    /// Network deadline in seconds
    #[arg(short = 't', long = "timeout", value_name = "SECONDS", value_parser = validate_timeout_secs)]
    pub timeout: Option<u64>,

    /// NATS credentials file
    #[arg(long = "creds", value_name = "FILE")]
    pub creds: Option<PathBuf>,

    /// Report format
    #[arg(long = "format", value_name = "FORMAT", value_parser = ["text", "table", "json"])]
    pub format: Option<String>,

    /// Report order
    #[arg(long = "order", value_name = "ORDER", value_parser = ["broker", "name", "lag"])]
    pub order: Option<String>,

    /// Show consumers ahead of the snapshot with a lag of 0
    #[arg(long = "clamp-negative")]
    pub clamp_negative: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Force colored output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub force_color: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Colour preference from the configuration file
    #[arg(skip)]
    pub color: Option<bool>,

    /// Log level
    #[arg(long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<String>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the process command line
    ///
    /// Help and version requests print and exit 0; malformed flags print
    /// usage and exit 2.
    pub fn parse_from_env() -> Self {
        Self::parse_from_iter(std::env::args_os())
    }

    pub fn parse_from_iter<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Self::try_parse_from_iter(args) {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    pub fn try_parse_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let args: Vec<std::ffi::OsString> = args.into_iter().map(Into::into).collect();
        let help_color = std::io::stdout().is_terminal() && !args.iter().any(|a| a == "--no-color");

        let matches = Self::command()
            .styles(palette_to_clap(help_color))
            .long_version(long_version())
            .try_get_matches_from(args)?;
        Self::from_arg_matches(&matches)
    }

    /// Effective broker URL: `--url`, then `-u`, then the default
    pub fn broker_url(&self) -> String {
        self.url
            .as_deref()
            .or(self.short_url.as_deref())
            .unwrap_or(DEFAULT_BROKER_URL)
            .to_string()
    }

    pub fn stream_name(&self) -> &str {
        self.stream.as_deref().unwrap_or("")
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_BUDGET)
    }

    pub fn report_format(&self) -> Result<ReportFormat, strum::ParseError> {
        self.format
            .as_deref()
            .map_or(Ok(ReportFormat::default()), ReportFormat::from_str)
    }

    pub fn report_order(&self) -> Result<ReportOrder, strum::ParseError> {
        self.order
            .as_deref()
            .map_or(Ok(ReportOrder::default()), ReportOrder::from_str)
    }

    /// Colour setting: flags, then configuration, then `None` for auto
    pub fn color_setting(&self) -> Option<bool> {
        match (self.force_color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => self.color,
        }
    }

    /// Resolve colour for a stream, detecting a terminal when unset
    pub fn use_color(&self, stream_is_terminal: bool) -> bool {
        self.color_setting().unwrap_or(stream_is_terminal)
    }

    /// Log file destination; `none` and `-` mean no file
    pub fn log_file_path(&self) -> Option<&str> {
        self.log_file
            .as_deref()
            .filter(|p| !p.eq_ignore_ascii_case("none") && *p != "-")
    }
}
