//! User directory port - contact details for notifications.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

/// Name and address to send mail to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContact {
    pub name: String,
    pub email: String,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Looks up a user's contact details.
    async fn find_contact(&self, user_id: &UserId) -> Result<Option<UserContact>, DomainError>;
}
