//! Application use cases. Orchestrate domain logic via ports.

pub mod audit_trail;
pub mod content_generator;
pub mod content_reviewer;
pub mod posting_job;
pub mod publication_pipeline;
pub mod scheduler;
pub mod setup;
pub mod topic_selector;

#[cfg(test)]
pub(crate) mod fakes;

pub use audit_trail::AuditTrail;
pub use content_generator::ContentGenerator;
pub use content_reviewer::ContentReviewer;
pub use posting_job::PostingJob;
pub use publication_pipeline::{MAX_RETRIES_MESSAGE, PublicationPipeline, RetryPolicy, X_CREATED};
pub use scheduler::Scheduler;
pub use setup::{
    AppContext, Collaborators, DryRunSocial, SetupItem, SetupReport, SetupStatus,
    UnavailableSocial,
};
