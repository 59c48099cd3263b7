//! Cross-cutting pieces shared by adapters and use cases.

pub mod config;
