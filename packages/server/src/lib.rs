// Meeker Lakes Community Portal - API Core
//
// Backend for the resident photo gallery: submission intake, moderation,
// owner notifications, and the search-index bridge.
//
// Architecture follows domain-driven design; background delivery runs in an
// in-process worker over a Postgres-backed job table.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
