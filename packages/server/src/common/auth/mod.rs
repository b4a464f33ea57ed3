/// Authorization module for the Meeker Lakes community portal
///
/// Provides a fluent API for authorization checks in activity code:
///
/// ```rust
/// use crate::common::auth::{Actor, AdminCapability};
///
/// // In an activity:
/// Actor::new(actor_id, actor_email)
///     .can(AdminCapability::Moderate)
///     .check(deps)
///     .await?;
/// ```
///
/// This pattern keeps authorization logic in the activity layer where it
/// belongs, not in the route handler layer.

mod errors;
mod capability;
mod builder;

pub use errors::AuthError;
pub use capability::AdminCapability;
pub use builder::{Actor, CapabilityBuilder, HasAuthContext};
