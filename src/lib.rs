//! topic-poster: scheduled AI-drafted posts to X and Bluesky with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
