//! In-memory implementation of UserDirectory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{UserContact, UserDirectory};

#[derive(Default)]
pub struct InMemoryUserDirectory {
    contacts: RwLock<HashMap<UserId, UserContact>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contact(self, user_id: UserId, name: &str, email: &str) -> Self {
        if let Ok(mut contacts) = self.contacts.write() {
            contacts.insert(
                user_id,
                UserContact {
                    name: name.to_string(),
                    email: email.to_string(),
                },
            );
        }
        self
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_contact(&self, user_id: &UserId) -> Result<Option<UserContact>, DomainError> {
        let contacts = self
            .contacts
            .read()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "user directory lock poisoned"))?;
        Ok(contacts.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_seeded_contact() {
        let user = UserId::new("u1").unwrap();
        let directory = InMemoryUserDirectory::new().with_contact(user.clone(), "Asha", "asha@example.com");

        let contact = directory.find_contact(&user).await.unwrap().unwrap();
        assert_eq!(contact.email, "asha@example.com");
        assert!(directory
            .find_contact(&UserId::new("u2").unwrap())
            .await
            .unwrap()
            .is_none());
    }
}
