use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Producers write counts through Python's `json.dump`, which may emit them
/// as floats; anything that is not a non-negative whole number is rejected.
fn whole_count(value: f64) -> Result<u64, String> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as u64)
    } else {
        Err(format!("count must be a non-negative integer, got {}", value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(String, f64)")]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}

impl DomainCount {
    pub fn new(domain: impl Into<String>, count: u64) -> Self {
        Self {
            domain: domain.into(),
            count,
        }
    }
}

impl TryFrom<(String, f64)> for DomainCount {
    type Error = String;

    fn try_from((domain, count): (String, f64)) -> Result<Self, Self::Error> {
        Ok(Self {
            domain,
            count: whole_count(count)?,
        })
    }
}

/// Active peers reported by the aggregation job. Only the length is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerList(pub Vec<serde_json::Value>);

impl PeerList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A `[path, count]` pair where path looks like `domain/segment/...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(String, f64)")]
pub struct PaperEntry {
    pub path: String,
    pub count: u64,
}

impl PaperEntry {
    pub fn new(path: impl Into<String>, count: u64) -> Self {
        Self {
            path: path.into(),
            count,
        }
    }
}

impl TryFrom<(String, f64)> for PaperEntry {
    type Error = String;

    fn try_from((path, count): (String, f64)) -> Result<Self, Self::Error> {
        Ok(Self {
            path,
            count: whole_count(count)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64)")]
pub struct ScoredPeer {
    pub identifier: String,
    pub score: f64,
}

impl From<(String, f64)> for ScoredPeer {
    fn from((identifier, score): (String, f64)) -> Self {
        Self { identifier, score }
    }
}

/// Identifier -> peers ordered as the producer wrote them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityIndex(pub HashMap<String, Vec<ScoredPeer>>);

impl SimilarityIndex {
    pub fn get(&self, identifier: &str) -> Option<&[ScoredPeer]> {
        self.0.get(identifier).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarMatch {
    pub identifier: String,
    pub percent: u8,
}

impl SimilarMatch {
    pub fn from_score(identifier: &str, score: f64) -> Self {
        Self {
            identifier: identifier.to_string(),
            percent: (score * 100.0).round().clamp(0.0, 100.0) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_counts_from_pairs() {
        let parsed: Vec<DomainCount> =
            serde_json::from_str(r#"[["www.github.com", 42], ["arxiv.org", 7.0]]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                DomainCount::new("www.github.com", 42),
                DomainCount::new("arxiv.org", 7)
            ]
        );
    }

    #[test]
    fn test_fractional_or_negative_counts_are_rejected() {
        assert!(serde_json::from_str::<Vec<DomainCount>>(r#"[["a.com", 1.5]]"#).is_err());
        assert!(serde_json::from_str::<Vec<PaperEntry>>(r#"[["a.com/x", -1]]"#).is_err());
        assert!(serde_json::from_str::<Vec<PaperEntry>>(r#"[["a.com/x"]]"#).is_err());
    }

    #[test]
    fn test_peer_list_accepts_arbitrary_elements() {
        let peers: PeerList =
            serde_json::from_str(r#"["a@x.com", {"name": "b"}, 3, null]"#).unwrap();
        assert_eq!(peers.len(), 4);
    }

    #[test]
    fn test_similarity_index_shape() {
        let index: SimilarityIndex =
            serde_json::from_str(r#"{"a@x.com": [["b@x.com", 0.5]], "b@x.com": []}"#).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("a@x.com").unwrap()[0].identifier, "b@x.com");
        assert!(index.get("b@x.com").unwrap().is_empty());
        assert!(index.get("c@x.com").is_none());

        assert!(serde_json::from_str::<SimilarityIndex>(r#"["a@x.com"]"#).is_err());
    }

    #[test]
    fn test_percent_rounding_and_clamping() {
        assert_eq!(SimilarMatch::from_score("x", 0.915).percent, 92);
        assert_eq!(SimilarMatch::from_score("x", 0.004).percent, 0);
        assert_eq!(SimilarMatch::from_score("x", 1.7).percent, 100);
        assert_eq!(SimilarMatch::from_score("x", -0.2).percent, 0);
    }
}
