//! Session validation port for bearer token validation.
//!
//! Implementations must validate the token signature and expiry, and map the
//! claims to an [`AuthenticatedUser`]. Returning `AuthError::TokenExpired`
//! separately from `InvalidToken` lets clients prompt for re-login.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the `Bearer ` prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
