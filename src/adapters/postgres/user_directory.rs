//! PostgreSQL implementation of UserDirectory.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{UserContact, UserDirectory};

pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    name: String,
    email: String,
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_contact(&self, user_id: &UserId) -> Result<Option<UserContact>, DomainError> {
        let row: Option<ContactRow> = sqlx::query_as("SELECT name, email FROM users WHERE id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find user: {}", e)))?;

        Ok(row.map(|r| UserContact {
            name: r.name,
            email: r.email,
        }))
    }
}
