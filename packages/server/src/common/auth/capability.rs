/// Capabilities in the community portal
///
/// The moderation pipeline is the only admin surface today, so the set is
/// small; new admin features add variants here rather than new ad-hoc flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCapability {
    /// Review photo submissions (approve/reject) and read the audit log
    Moderate,
}

impl AdminCapability {
    /// Check if this capability requires admin access
    pub fn requires_admin(&self) -> bool {
        // All capabilities in this system require admin access
        true
    }
}
