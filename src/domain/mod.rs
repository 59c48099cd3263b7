//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    AUDIT_TIME_FORMAT, AttemptOutcome, AuditEntry, Draft, LogCategory, NewsItem, Platform,
    PostReceipt, PublicationOutcome, TOPICS, Topic, VOICES, Verdict, Voice, render_news,
};
pub use errors::DomainError;
