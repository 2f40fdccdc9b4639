use crate::utils::error::Result;
use std::time::Duration;

/// Where the aggregation job's JSON artifacts are read from.
pub trait ArtifactSource: Send + Sync {
    fn fetch(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    /// Human readable location used in log lines.
    fn describe(&self) -> String;
}

/// Relative locations of the four artifacts under a source root.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArtifactPaths {
    pub most_viewed_domains: String,
    pub peers: String,
    pub similarity: String,
    pub top_papers: String,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            most_viewed_domains: "outputs/output_most_viewed_domains.json".to_string(),
            peers: "outputs/output_peers.json".to_string(),
            similarity: "outputs/output_similarity.json".to_string(),
            top_papers: "outputs/output_top_papers.json".to_string(),
        }
    }
}

impl ArtifactPaths {
    pub fn all(&self) -> [&str; 4] {
        [
            &self.most_viewed_domains,
            &self.peers,
            &self.similarity,
            &self.top_papers,
        ]
    }
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> &str;
    fn output_path(&self) -> &str;
    fn artifacts(&self) -> &ArtifactPaths;
    fn request_timeout(&self) -> Option<Duration>;
    fn title(&self) -> &str;
}
