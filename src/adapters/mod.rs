//! Infrastructure adapters. Implement outbound ports.
//!
//! News search, AI backends, X, Bluesky, spreadsheets, local files. Map errors to DomainError.

pub mod ai;
pub mod bluesky;
pub mod persistence;
pub mod search;
pub mod sheets;
pub mod ui;
pub mod x;
