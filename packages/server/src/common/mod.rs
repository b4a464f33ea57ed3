// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod error;
pub mod id;

pub use auth::{Actor, AdminCapability, AuthError, HasAuthContext};
pub use entity_ids::*;
pub use error::AppError;
pub use id::{Id, V4, V7};
