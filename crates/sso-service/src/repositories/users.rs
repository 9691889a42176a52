//! `users` table access for [`PgStore`].

use super::postgres::{classify, timed, PgStore};
use super::CredentialStore;
use crate::errors::{Entity, StoreError};
use crate::models::User;
use std::time::Instant;
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    pass_hash: Vec<u8>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            pass_hash: row.pass_hash,
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for PgStore {
    #[instrument(skip_all)]
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<i64, StoreError> {
        let start = Instant::now();
        let result = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO users (email, pass_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(pass_hash)
        .fetch_one(self.pool())
        .await;

        let (id,) = timed("insert", "users", start, result)
            .map_err(|e| classify(e, "Failed to create user"))?;

        tracing::debug!(target: "sso.repository.users", user_id = id, "User created");
        Ok(id)
    }

    #[instrument(skip_all)]
    async fn get_user(&self, email: &str) -> Result<User, StoreError> {
        let start = Instant::now();
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, pass_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await;

        timed("select", "users", start, result)
            .map_err(|e| classify(e, "Failed to fetch user by email"))?
            .map(User::from)
            .ok_or(StoreError::NotFound(Entity::User))
    }

    #[instrument(skip_all, fields(user_id = id))]
    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError> {
        let start = Instant::now();
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, pass_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await;

        timed("select", "users", start, result)
            .map_err(|e| classify(e, "Failed to fetch user by id"))?
            .map(User::from)
            .ok_or(StoreError::NotFound(Entity::User))
    }
}
