//! Enrollment policy flags

use serde::Deserialize;

use crate::domain::enrollment::AccessRule;

/// Policy choices for revoked enrollments.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentPolicyConfig {
    /// A confirmed payment moves a revoked enrollment back to active
    #[serde(default)]
    pub reactivate_revoked_on_payment: bool,

    /// Paid lectures need a granted or active row, not just any row
    #[serde(default = "default_true")]
    pub access_requires_active_status: bool,
}

impl EnrollmentPolicyConfig {
    pub fn access_rule(&self) -> AccessRule {
        AccessRule::from_requires_active_status(self.access_requires_active_status)
    }
}

impl Default for EnrollmentPolicyConfig {
    fn default() -> Self {
        Self {
            reactivate_revoked_on_payment: false,
            access_requires_active_status: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}
