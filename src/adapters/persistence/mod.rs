//! Local file persistence: CSV audit fallback and the token store.

pub mod csv_audit;
pub mod token_store;

pub use csv_audit::CsvAuditLog;
pub use token_store::JsonTokenStore;
