// Adapters layer: concrete artifact sources for remote datasites.

pub mod http;

pub use http::HttpSource;
