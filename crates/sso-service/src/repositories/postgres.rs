//! PostgreSQL storage adapter.
//!
//! [`PgStore`] implements every storage capability over one sqlx pool. The
//! trait impls live beside the tables they touch (`users.rs`, `apps.rs`,
//! `permissions.rs`); this module holds the shared handle and error
//! classification.
//!
//! # Security
//!
//! - All queries use parameterized statements
//! - Password hashes and app secrets are never logged
//! - Multi-row mutations run inside a single transaction

use crate::errors::{Entity, StoreError};
use crate::observability::metrics;
use sqlx::PgPool;
use std::time::Instant;

/// Storage adapter over a PostgreSQL pool.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Translate a sqlx error into a storage kind.
///
/// Named constraints from the schema identify the conflicting entity;
/// everything else becomes [`StoreError::Database`] prefixed with `context`.
pub(crate) fn classify(err: sqlx::Error, context: &str) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.constraint() {
            Some("users_email_unique") => return StoreError::UserExists,
            Some("apps_name_unique") => return StoreError::AppExists,
            Some("creators_app_unique") => return StoreError::CreatorExists,
            Some(c) if c.ends_with("_user_fk") => return StoreError::NotFound(Entity::User),
            Some(c) if c.ends_with("_app_fk") => return StoreError::NotFound(Entity::App),
            _ => {}
        }
    }
    StoreError::Database(format!("{}: {}", context, err))
}

/// Record query duration and pass the result through.
pub(crate) fn timed<T>(
    operation: &str,
    table: &str,
    start: Instant,
    result: Result<T, sqlx::Error>,
) -> Result<T, sqlx::Error> {
    metrics::record_db_query(operation, table, start.elapsed());
    result
}
