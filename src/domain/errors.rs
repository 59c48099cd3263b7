//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Setup failed: {0}")]
    Setup(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("News search failed: {0}")]
    Search(String),

    #[error("Content generation failed: {0}")]
    Generator(String),

    #[error("Content review failed: {0}")]
    Reviewer(String),

    #[error("Platform publish failed: {0}")]
    Platform(String),

    #[error("Audit log write failed: {0}")]
    AuditLog(String),
}

impl DomainError {
    /// Stable short name of the failure class, used as the prefix of audit messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Setup(_) => "SetupError",
            DomainError::Auth(_) => "AuthError",
            DomainError::Config(_) => "ConfigError",
            DomainError::Search(_) => "SearchFailure",
            DomainError::Generator(_) => "GeneratorFailure",
            DomainError::Reviewer(_) => "ReviewerFailure",
            DomainError::Platform(_) => "PlatformPublishFailure",
            DomainError::AuditLog(_) => "AuditLogFailure",
        }
    }

    /// `"<kind> - <detail>"`, the form written to the error logs.
    pub fn audit_message(&self) -> String {
        format!("{} - {}", self.kind(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_message_prefixes_kind() {
        let err = DomainError::Generator("HTTP request failed: timeout".into());
        assert_eq!(
            err.audit_message(),
            "GeneratorFailure - Content generation failed: HTTP request failed: timeout"
        );
    }
}
