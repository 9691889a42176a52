//! Use-case services.
//!
//! Each service holds the storage capabilities it needs as `Arc<dyn _>` and
//! maps every [`StoreError`](crate::errors::StoreError) to an
//! [`SsoError`](crate::errors::SsoError) before returning.

pub mod app_service;
pub mod auth_service;
pub mod authorization_gate;
pub mod permission_service;

pub use app_service::AppService;
pub use auth_service::AuthService;
pub use authorization_gate::AuthorizationGate;
pub use permission_service::PermissionService;

use crate::crypto;
use crate::errors::{SsoError, StoreError};
use crate::models::AppRef;
use crate::observability::metrics;
use crate::repositories::{AppRegistry, CredentialStore};

/// Resolve the (user id, app id) pair of a role query.
///
/// `None` when either side no longer exists; role queries answer `false`
/// for those rather than failing.
pub(crate) async fn resolve_role_target(
    users: &dyn CredentialStore,
    apps: &dyn AppRegistry,
    user_id: i64,
    app: &AppRef,
) -> Result<Option<(i64, i64)>, SsoError> {
    let user = match users.get_user_by_id(user_id).await {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(SsoError::from_store(e)),
    };
    let app = match apps.get_app(app).await {
        Ok(app) => app,
        Err(StoreError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(SsoError::from_store(e)),
    };
    Ok(Some((user.id, app.id)))
}

/// Storage mapping for lookups whose miss must not be distinguishable from
/// bad input.
pub(crate) fn not_found_as_invalid_credentials(err: StoreError) -> SsoError {
    match err {
        StoreError::NotFound(_) => SsoError::InvalidCredentials,
        other => SsoError::from_store(other),
    }
}

/// Count a failed operation and pass the error through.
pub(crate) fn record_failure(operation: &'static str, err: SsoError) -> SsoError {
    metrics::record_error(operation, err.error_type_label());
    err
}

/// bcrypt is CPU bound; keep it off the async workers.
pub(crate) async fn hash_password_blocking(
    password: String,
    cost: u32,
) -> Result<Vec<u8>, SsoError> {
    tokio::task::spawn_blocking(move || crypto::hash_password(&password, cost))
        .await
        .map_err(|e| SsoError::Internal(format!("Password hashing task failed: {}", e)))?
}

pub(crate) async fn verify_password_blocking(
    password: String,
    hash: Vec<u8>,
) -> Result<bool, SsoError> {
    tokio::task::spawn_blocking(move || crypto::verify_password(&password, &hash))
        .await
        .map_err(|e| SsoError::Internal(format!("Password verification task failed: {}", e)))?
}
