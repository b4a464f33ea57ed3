//! Audit domain actions

mod query_audit_log;

pub use query_audit_log::query_audit_records;
