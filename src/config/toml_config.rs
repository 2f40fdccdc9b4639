use crate::config::DashboardSettings;
use crate::domain::ports::ArtifactPaths;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub dashboard: DashboardSection,
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub artifacts: ArtifactSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSection {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSection {
    pub location: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactSection {
    pub most_viewed_domains: Option<String>,
    pub peers: Option<String>,
    pub similarity: Option<String>,
    pub top_papers: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATASITE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::default();
        let pick = |value: &Option<String>, fallback: String| value.clone().unwrap_or(fallback);
        ArtifactPaths {
            most_viewed_domains: pick(
                &self.artifacts.most_viewed_domains,
                defaults.most_viewed_domains,
            ),
            peers: pick(&self.artifacts.peers, defaults.peers),
            similarity: pick(&self.artifacts.similarity, defaults.similarity),
            top_papers: pick(&self.artifacts.top_papers, defaults.top_papers),
        }
    }

    /// Builds settings from the file. `source_override` (the `--source` flag)
    /// wins over `[source] location`; one of the two must be present.
    pub fn into_settings(self, source_override: Option<&str>) -> Result<DashboardSettings> {
        let location = source_override
            .map(str::to_string)
            .or_else(|| self.source.location.clone());
        let source = validation::validate_required_field("source.location", &location)?.clone();

        let mut settings = DashboardSettings {
            artifacts: self.artifact_paths(),
            request_timeout: self.request_timeout(),
            source,
            ..DashboardSettings::default()
        };
        if let Some(title) = self.dashboard.title {
            settings.title = title;
        }
        if let Some(path) = self.output.path {
            settings.output_path = path;
        }
        Ok(settings)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_settings(None)?.validate()
    }
}
