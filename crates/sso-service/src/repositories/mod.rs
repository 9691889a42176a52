//! Storage capabilities.
//!
//! Services depend on three narrow traits rather than on a database handle:
//!
//! - [`CredentialStore`]: users and their password hashes
//! - [`AppRegistry`]: applications and their signing secrets
//! - [`PermissionLedger`]: admin and creator relations
//!
//! [`postgres::PgStore`] implements all three over a sqlx pool.
//! [`memory::MemoryStore`] implements them in memory for tests.

pub mod memory;
pub mod postgres;

mod apps;
mod permissions;
mod users;

use crate::errors::StoreError;
use crate::models::{App, AppRef, User};
use secrecy::SecretString;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persists and retrieves user identity and password hash.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::UserExists`] if the email is taken.
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<i64, StoreError>;

    /// Fetch a user by exact email.
    async fn get_user(&self, email: &str) -> Result<User, StoreError>;

    /// Fetch a user by id.
    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError>;
}

/// Persists and retrieves application identity and signing secret.
#[async_trait::async_trait]
pub trait AppRegistry: Send + Sync {
    async fn get_app_by_name(&self, name: &str) -> Result<App, StoreError>;

    async fn get_app_by_id(&self, id: i64) -> Result<App, StoreError>;

    /// Resolve an app by whichever key the caller supplied.
    async fn get_app(&self, app: &AppRef) -> Result<App, StoreError> {
        match app {
            AppRef::Id(id) => self.get_app_by_id(*id).await,
            AppRef::Name(name) => self.get_app_by_name(name).await,
        }
    }

    /// Insert an app. Fails with [`StoreError::AppExists`] on name collision.
    async fn create_app(&self, name: &str, secret: &SecretString) -> Result<i64, StoreError>;

    /// Insert an app together with its creator and admin relations for
    /// `creator_id`. All three rows are written or none are.
    async fn create_app_with_creator(
        &self,
        name: &str,
        secret: &SecretString,
        creator_id: i64,
    ) -> Result<i64, StoreError>;

    /// Rename app `id` and replace its secret.
    ///
    /// Fails with `NotFound(App)` if `id` is absent and `AppExists` if
    /// `new_name` belongs to a different app.
    async fn update_app(
        &self,
        id: i64,
        new_name: &str,
        new_secret: &SecretString,
    ) -> Result<(), StoreError>;

    /// Delete app `id` and every admin/creator relation referencing it,
    /// atomically.
    async fn delete_app(&self, id: i64) -> Result<(), StoreError>;
}

/// Persists and queries per-application role relations.
#[async_trait::async_trait]
pub trait PermissionLedger: Send + Sync {
    /// Grant admin. Granting an existing relation succeeds without change.
    async fn set_admin(&self, user_id: i64, app_id: i64) -> Result<(), StoreError>;

    /// Revoke admin. Revoking an absent relation succeeds without change.
    async fn del_admin(&self, user_id: i64, app_id: i64) -> Result<(), StoreError>;

    async fn is_admin(&self, user_id: i64, app_id: i64) -> Result<bool, StoreError>;

    /// Record the creator of an app. An app has at most one creator:
    /// re-recording the same user succeeds, any other user gets
    /// [`StoreError::CreatorExists`]. Services create creators only through
    /// [`AppRegistry::create_app_with_creator`].
    async fn set_creator(&self, user_id: i64, app_id: i64) -> Result<(), StoreError>;

    async fn is_creator(&self, user_id: i64, app_id: i64) -> Result<bool, StoreError>;
}
