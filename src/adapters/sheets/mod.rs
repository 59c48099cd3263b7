//! Google Sheets audit log adapter.

pub mod audit_log;
pub mod auth;
pub mod client;

pub use audit_log::SheetAuditLog;
