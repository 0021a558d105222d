//! Mock session validator for testing.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_student("student-token", "user-123")
//!     .with_admin("admin-token", "admin-1");
//!
//! let user = validator.validate("student-token").await?;
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId, UserRole};
use crate::ports::SessionValidator;

/// Stores a map of tokens to users. Unknown tokens return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Error returned for every validation, if set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    pub fn with_student(self, token: impl Into<String>, user_id: &str) -> Self {
        let user = test_user(user_id, UserRole::Student);
        self.with_user(token, user)
    }

    pub fn with_admin(self, token: impl Into<String>, user_id: &str) -> Self {
        let user = test_user(user_id, UserRole::Admin);
        self.with_user(token, user)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }
}

fn test_user(user_id: &str, role: UserRole) -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::new(user_id).unwrap(),
        format!("{}@test.example.com", user_id),
        Some(format!("Test User {}", user_id)),
        role,
    )
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_token_returns_user() {
        let validator = MockSessionValidator::new().with_admin("t", "admin-1");
        let user = validator.validate("t").await.unwrap();
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let validator = MockSessionValidator::new();
        assert!(matches!(
            validator.validate("nope").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn forced_error_wins() {
        let validator = MockSessionValidator::new()
            .with_student("t", "user-1")
            .with_error(AuthError::TokenExpired);
        assert!(matches!(validator.validate("t").await, Err(AuthError::TokenExpired)));
    }
}
