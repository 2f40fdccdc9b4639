use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} while fetching {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Fetch of '{artifact}' did not complete: {message}")]
    FetchAborted { artifact: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed artifact '{artifact}': {message}")]
    MalformedArtifact { artifact: String, message: String },

    #[error("Page target not found: {selector}")]
    MissingTarget { selector: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Page,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatusError { .. } | Self::FetchAborted { .. } => {
                ErrorCategory::Network
            }
            Self::SerializationError(_) | Self::MalformedArtifact { .. } => ErrorCategory::Data,
            Self::MissingTarget { .. } => ErrorCategory::Page,
            Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Widget-level failures degrade one region of the page and are never
    /// fatal for a run; only configuration and output I/O stop the binary.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Page => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the artifact source is reachable and serves the outputs/ directory"
            }
            ErrorCategory::Data => {
                "Re-run the aggregation job; the artifact is not in the expected JSON shape"
            }
            ErrorCategory::Page => "The page layout is missing an expected element",
            ErrorCategory::Io => "Check file permissions and that the output directory is writable",
            ErrorCategory::Configuration => "Check the command line flags and the TOML config file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpStatusError { url, status } => {
                format!("The server answered {} for {}", status, url)
            }
            Self::MalformedArtifact { artifact, .. } => {
                format!("The artifact '{}' could not be understood", artifact)
            }
            Self::MissingConfigError { field } => {
                format!("A required setting is missing: {}", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_failures_are_not_critical() {
        let err = DashboardError::MissingTarget {
            selector: "#platformChart".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Page);
        assert_eq!(err.severity(), ErrorSeverity::Low);

        let err = DashboardError::HttpStatusError {
            url: "http://localhost/outputs/output_peers.json".to_string(),
            status: 404,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.severity() < ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("404"));

        let err = DashboardError::FetchAborted {
            artifact: "outputs/output_similarity.json".to_string(),
            message: "task panicked".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = DashboardError::MissingConfigError {
            field: "source".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.user_friendly_message(), "A required setting is missing: source");
    }
}
