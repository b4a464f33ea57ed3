pub mod audit_record;

pub use audit_record::*;
