use crate::domain::ports::ArtifactSource;
use crate::utils::error::{DashboardError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Reads artifacts over HTTP relative to a base URL such as
/// `https://datasite.example/public/browser_history_agg/`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: Url,
    client: Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| DashboardError::InvalidConfigValueError {
            field: "source".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        // Without the trailing slash `join` would replace the last segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base,
            client: builder.build()?,
        })
    }

    pub fn artifact_url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches("./"))
            .map_err(|e| DashboardError::InvalidConfigValueError {
                field: "artifacts".to_string(),
                value: path.to_string(),
                reason: format!("Cannot resolve against {}: {}", self.base, e),
            })
    }
}

impl ArtifactSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.artifact_url(path)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(DashboardError::HttpStatusError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}
