pub mod cli;
pub mod toml_config;

use crate::domain::ports::{ArtifactPaths, ConfigProvider};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_TITLE: &str = "Learner Dashboard";
pub const DEFAULT_SOURCE: &str = ".";
pub const DEFAULT_OUTPUT_PATH: &str = "./dashboard";
pub const PAGE_FILE_NAME: &str = "index.html";

/// Fully resolved settings after merging the config file and CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub source: String,
    pub output_path: String,
    pub artifacts: ArtifactPaths,
    pub request_timeout: Option<Duration>,
    pub title: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            artifacts: ArtifactPaths::default(),
            request_timeout: None,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl ConfigProvider for DashboardSettings {
    fn source(&self) -> &str {
        &self.source
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn artifacts(&self) -> &ArtifactPaths {
        &self.artifacts
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Validate for DashboardSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_source("source", &self.source)?;
        validation::validate_path("output_path", &self.output_path)?;
        for path in self.artifacts.all() {
            validation::validate_path("artifacts", path)?;
        }
        validation::validate_file_extensions("artifacts", &self.artifacts.all(), &["json"])?;
        if let Some(timeout) = self.request_timeout {
            validation::validate_positive_number("timeout_seconds", timeout.as_secs(), 1)?;
        }
        validation::validate_non_empty_string("title", &self.title)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "learner-dashboard")]
#[command(about = "Render the browser-history learner dashboard and search similar learners")]
pub struct CliConfig {
    /// Directory or http(s) base URL holding the outputs/ artifacts
    #[arg(long)]
    pub source: Option<String>,

    /// Directory the rendered index.html is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Dashboard title
    #[arg(long)]
    pub title: Option<String>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Run one search before writing the page
    #[arg(long)]
    pub search: Option<String>,

    /// Read search terms from stdin, one per line
    #[arg(short, long)]
    pub interactive: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file if one was given, then applies flag overrides.
    pub fn resolve(&self) -> Result<DashboardSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                toml_config::TomlConfig::from_file(path)?.into_settings(self.source.as_deref())?
            }
            None => DashboardSettings::default(),
        };

        if let Some(source) = &self.source {
            settings.source = source.clone();
        }
        if let Some(output_path) = &self.output_path {
            settings.output_path = output_path.clone();
        }
        if let Some(title) = &self.title {
            settings.title = title.clone();
        }
        if let Some(secs) = self.timeout_secs {
            settings.request_timeout = Some(Duration::from_secs(secs));
        }

        settings.validate()?;
        Ok(settings)
    }
}
