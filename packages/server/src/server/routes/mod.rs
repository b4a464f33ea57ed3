// HTTP routes
pub mod audit;
pub mod gallery;
pub mod health;
pub mod moderation;
pub mod submissions;

pub use audit::*;
pub use gallery::*;
pub use health::*;
pub use moderation::*;
pub use submissions::*;

use axum::extract::Extension;

use crate::common::AppError;
use crate::server::middleware::AuthUser;

/// Unwrap the optional auth extension, rejecting unauthenticated requests.
pub(crate) fn require_user(user: Option<Extension<AuthUser>>) -> Result<AuthUser, AppError> {
    user.map(|Extension(user)| user).ok_or(AppError::Unauthorized)
}
