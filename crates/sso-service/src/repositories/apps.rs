//! `apps` table access for [`PgStore`].
//!
//! App creation and deletion touch the relation tables too and run inside a
//! single transaction; dropping the transaction before `commit` rolls back.

use super::postgres::{classify, timed, PgStore};
use super::AppRegistry;
use crate::errors::{Entity, StoreError};
use crate::models::App;
use secrecy::{ExposeSecret, SecretString};
use std::time::Instant;
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct AppRow {
    id: i64,
    name: String,
    secret: String,
}

impl From<AppRow> for App {
    fn from(row: AppRow) -> Self {
        App {
            id: row.id,
            name: row.name,
            secret: SecretString::from(row.secret),
        }
    }
}

#[async_trait::async_trait]
impl AppRegistry for PgStore {
    #[instrument(skip_all)]
    async fn get_app_by_name(&self, name: &str) -> Result<App, StoreError> {
        let start = Instant::now();
        let result = sqlx::query_as::<_, AppRow>(
            r#"
            SELECT id, name, secret
            FROM apps
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool())
        .await;

        timed("select", "apps", start, result)
            .map_err(|e| classify(e, "Failed to fetch app by name"))?
            .map(App::from)
            .ok_or(StoreError::NotFound(Entity::App))
    }

    #[instrument(skip_all, fields(app_id = id))]
    async fn get_app_by_id(&self, id: i64) -> Result<App, StoreError> {
        let start = Instant::now();
        let result = sqlx::query_as::<_, AppRow>(
            r#"
            SELECT id, name, secret
            FROM apps
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await;

        timed("select", "apps", start, result)
            .map_err(|e| classify(e, "Failed to fetch app by id"))?
            .map(App::from)
            .ok_or(StoreError::NotFound(Entity::App))
    }

    #[instrument(skip_all)]
    async fn create_app(&self, name: &str, secret: &SecretString) -> Result<i64, StoreError> {
        let start = Instant::now();
        let result = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO apps (name, secret)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(secret.expose_secret())
        .fetch_one(self.pool())
        .await;

        let (id,) = timed("insert", "apps", start, result)
            .map_err(|e| classify(e, "Failed to create app"))?;
        Ok(id)
    }

    #[instrument(skip_all, fields(creator_id = creator_id))]
    async fn create_app_with_creator(
        &self,
        name: &str,
        secret: &SecretString,
        creator_id: i64,
    ) -> Result<i64, StoreError> {
        let start = Instant::now();
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| classify(e, "Failed to start transaction"))?;

        let (app_id,) = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO apps (name, secret)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(secret.expose_secret())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify(e, "Failed to create app"))?;

        sqlx::query(
            r#"
            INSERT INTO creators (user_id, app_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(creator_id)
        .bind(app_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| classify(e, "Failed to record app creator"))?;

        sqlx::query(
            r#"
            INSERT INTO admins (user_id, app_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, app_id) DO NOTHING
            "#,
        )
        .bind(creator_id)
        .bind(app_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| classify(e, "Failed to record creator admin"))?;

        let result = tx.commit().await;
        timed("create_with_creator", "apps", start, result)
            .map_err(|e| classify(e, "Failed to commit app creation"))?;

        tracing::info!(
            target: "sso.repository.apps",
            app_id = app_id,
            creator_id = creator_id,
            "App created"
        );

        Ok(app_id)
    }

    #[instrument(skip_all, fields(app_id = id))]
    async fn update_app(
        &self,
        id: i64,
        new_name: &str,
        new_secret: &SecretString,
    ) -> Result<(), StoreError> {
        let start = Instant::now();
        let result = sqlx::query(
            r#"
            UPDATE apps
            SET name = $2, secret = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(new_name)
        .bind(new_secret.expose_secret())
        .execute(self.pool())
        .await;

        let done = timed("update", "apps", start, result)
            .map_err(|e| classify(e, "Failed to update app"))?;

        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound(Entity::App));
        }
        Ok(())
    }

    #[instrument(skip_all, fields(app_id = id))]
    async fn delete_app(&self, id: i64) -> Result<(), StoreError> {
        let start = Instant::now();
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| classify(e, "Failed to start transaction"))?;

        // Lock the row so a concurrent grant cannot reference it mid-delete.
        let (app_id,) = sqlx::query_as::<_, (i64,)>(
            r#"
            SELECT id FROM apps
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| classify(e, "Failed to lock app"))?
        .ok_or(StoreError::NotFound(Entity::App))?;

        sqlx::query("DELETE FROM admins WHERE app_id = $1")
            .bind(app_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| classify(e, "Failed to delete app admins"))?;

        sqlx::query("DELETE FROM creators WHERE app_id = $1")
            .bind(app_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| classify(e, "Failed to delete app creators"))?;

        sqlx::query("DELETE FROM apps WHERE id = $1")
            .bind(app_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| classify(e, "Failed to delete app"))?;

        let result = tx.commit().await;
        timed("delete_cascade", "apps", start, result)
            .map_err(|e| classify(e, "Failed to commit app deletion"))?;

        tracing::info!(target: "sso.repository.apps", app_id = app_id, "App deleted");
        Ok(())
    }
}
