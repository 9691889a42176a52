//! `admins` / `creators` relation access for [`PgStore`].

use super::postgres::{classify, timed, PgStore};
use super::PermissionLedger;
use crate::errors::StoreError;
use std::time::Instant;
use tracing::instrument;

#[async_trait::async_trait]
impl PermissionLedger for PgStore {
    #[instrument(skip_all, fields(user_id = user_id, app_id = app_id))]
    async fn set_admin(&self, user_id: i64, app_id: i64) -> Result<(), StoreError> {
        let start = Instant::now();
        let result = sqlx::query(
            r#"
            INSERT INTO admins (user_id, app_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, app_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(app_id)
        .execute(self.pool())
        .await;

        timed("insert", "admins", start, result)
            .map_err(|e| classify(e, "Failed to grant admin"))?;
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = user_id, app_id = app_id))]
    async fn del_admin(&self, user_id: i64, app_id: i64) -> Result<(), StoreError> {
        let start = Instant::now();
        let result = sqlx::query(
            r#"
            DELETE FROM admins
            WHERE user_id = $1 AND app_id = $2
            "#,
        )
        .bind(user_id)
        .bind(app_id)
        .execute(self.pool())
        .await;

        timed("delete", "admins", start, result)
            .map_err(|e| classify(e, "Failed to revoke admin"))?;
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = user_id, app_id = app_id))]
    async fn is_admin(&self, user_id: i64, app_id: i64) -> Result<bool, StoreError> {
        let start = Instant::now();
        let result = sqlx::query_as::<_, (bool,)>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM admins
                WHERE user_id = $1 AND app_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(app_id)
        .fetch_one(self.pool())
        .await;

        let (exists,) = timed("select", "admins", start, result)
            .map_err(|e| classify(e, "Failed to check admin"))?;
        Ok(exists)
    }

    #[instrument(skip_all, fields(user_id = user_id, app_id = app_id))]
    async fn set_creator(&self, user_id: i64, app_id: i64) -> Result<(), StoreError> {
        let start = Instant::now();
        let result = sqlx::query(
            r#"
            INSERT INTO creators (user_id, app_id)
            VALUES ($1, $2)
            ON CONFLICT (app_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(app_id)
        .execute(self.pool())
        .await;

        let inserted = timed("insert", "creators", start, result)
            .map_err(|e| classify(e, "Failed to record creator"))?
            .rows_affected();
        // Re-recording the existing creator is a no-op; anyone else is refused.
        if inserted == 0 && !self.is_creator(user_id, app_id).await? {
            return Err(StoreError::CreatorExists);
        }
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = user_id, app_id = app_id))]
    async fn is_creator(&self, user_id: i64, app_id: i64) -> Result<bool, StoreError> {
        let start = Instant::now();
        let result = sqlx::query_as::<_, (bool,)>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM creators
                WHERE user_id = $1 AND app_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(app_id)
        .fetch_one(self.pool())
        .await;

        let (exists,) = timed("select", "creators", start, result)
            .map_err(|e| classify(e, "Failed to check creator"))?;
        Ok(exists)
    }
}
