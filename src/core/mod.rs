pub mod chart;
pub mod engine;
pub mod input;
pub mod layout;
pub mod page;
pub mod papers;
pub mod peers;
pub mod search;
pub mod widget;

pub use crate::domain::model::{DomainCount, PaperEntry, PeerList, SimilarMatch, SimilarityIndex};
pub use crate::domain::ports::{ArtifactPaths, ArtifactSource, ConfigProvider};
pub use crate::utils::error::Result;
