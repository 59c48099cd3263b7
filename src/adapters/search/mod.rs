//! News search adapters.

pub mod duckduckgo;

pub use duckduckgo::DuckDuckGoNews;
