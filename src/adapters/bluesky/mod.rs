//! Bluesky adapter.

pub mod client;
pub mod facets;

pub use client::BlueskyClient;
