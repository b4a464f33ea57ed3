use super::{AdminCapability, AuthError};
use crate::common::entity_ids::ResidentId;
use anyhow::Result;

/// Entry point for authorization checks
///
/// Usage:
/// ```ignore
/// Actor::new(actor_id, actor_email)
///     .can(AdminCapability::Moderate)
///     .check(deps)
///     .await?;
/// ```
pub struct Actor {
    actor_id: ResidentId,
    email: String,
}

impl Actor {
    /// Create a new actor for authorization checks
    ///
    /// # Arguments
    /// * `actor_id` - The resident ID of the actor
    /// * `email` - Verified email from the session token; capability
    ///   membership is resolved against it on every check
    pub fn new(actor_id: ResidentId, email: impl Into<String>) -> Self {
        Self {
            actor_id,
            email: email.into(),
        }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: AdminCapability) -> CapabilityBuilder {
        CapabilityBuilder {
            actor_id: self.actor_id,
            email: self.email,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    actor_id: ResidentId,
    email: String,
    capability: AdminCapability,
}

impl CapabilityBuilder {
    /// Perform the authorization check
    pub async fn check<D>(self, deps: &D) -> Result<(), AuthError>
    where
        D: HasAuthContext,
    {
        check_capability(self.actor_id, &self.email, self.capability, deps).await
    }
}

/// Trait for dependencies that can perform auth checks
pub trait HasAuthContext: Send + Sync {
    fn admin_identifiers(&self) -> &[String];
}

/// Core permission check function
///
/// Capability membership is resolved here, per request, against the
/// configured admin identifier list. The session token proves who the actor
/// is; it never carries an admin flag, so a stale token cannot outlive a
/// removal from the list.
async fn check_capability<D>(
    _actor_id: ResidentId,
    email: &str,
    capability: AdminCapability,
    deps: &D,
) -> Result<(), AuthError>
where
    D: HasAuthContext,
{
    if capability.requires_admin() {
        let listed = deps
            .admin_identifiers()
            .iter()
            .any(|identifier| identifier.eq_ignore_ascii_case(email));

        if !listed {
            return Err(AuthError::AdminRequired);
        }
    }

    Ok(())
}
