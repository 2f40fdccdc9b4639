pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpSource;
pub use config::{cli::LocalStorage, DashboardSettings};
pub use core::engine::{Artifact, Dashboard, DashboardEngine, DashboardEvent, LoadReport};
pub use core::search::{SearchOutcome, SearchPanel};
pub use utils::error::{DashboardError, Result};
