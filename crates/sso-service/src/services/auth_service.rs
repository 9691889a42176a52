//! Login, registration and identity queries.

use super::{
    hash_password_blocking, not_found_as_invalid_credentials, record_failure,
    resolve_role_target, verify_password_blocking,
};
use crate::crypto::{self, DUMMY_HASH};
use crate::errors::{SsoError, StoreError};
use crate::models::AppRef;
use crate::observability::{hash_for_correlation, metrics};
use crate::repositories::{AppRegistry, CredentialStore, PermissionLedger};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Authentication use cases.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    apps: Arc<dyn AppRegistry>,
    ledger: Arc<dyn PermissionLedger>,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        apps: Arc<dyn AppRegistry>,
        ledger: Arc<dyn PermissionLedger>,
        token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            apps,
            ledger,
            token_ttl,
            bcrypt_cost,
        }
    }

    /// Verify credentials and mint a session token for `app`.
    ///
    /// Unknown email, wrong password and unknown app all fail with the same
    /// [`SsoError::InvalidCredentials`].
    #[instrument(
        skip_all,
        name = "sso.service.login",
        fields(email_hash = %hash_for_correlation(email), app = %app)
    )]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        app: &AppRef,
    ) -> Result<String, SsoError> {
        let result = self.login_inner(email, password, app).await;
        match &result {
            Ok(_) => {
                metrics::record_login("success");
                tracing::info!(target: "sso.service.auth", "User logged in");
            }
            Err(e) => {
                metrics::record_login("error");
                tracing::info!(target: "sso.service.auth", error = %e, "Login failed");
            }
        }
        result.map_err(|e| record_failure("login", e))
    }

    async fn login_inner(
        &self,
        email: &str,
        password: &str,
        app: &AppRef,
    ) -> Result<String, SsoError> {
        let user = match self.users.get_user(email).await {
            Ok(user) => Some(user),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => return Err(SsoError::from_store(e)),
        };

        // Run bcrypt for unknown emails too, against a hash that never matches.
        let hash = user
            .as_ref()
            .map(|u| u.pass_hash.clone())
            .unwrap_or_else(|| DUMMY_HASH.as_bytes().to_vec());
        let valid = verify_password_blocking(password.to_string(), hash).await?;

        let user = match user {
            Some(user) if valid => user,
            _ => return Err(SsoError::InvalidCredentials),
        };

        let app = self
            .apps
            .get_app(app)
            .await
            .map_err(not_found_as_invalid_credentials)?;

        crypto::mint_token(&user, &app, self.token_ttl)
    }

    /// Hash the password and store a new user.
    #[instrument(
        skip_all,
        name = "sso.service.register",
        fields(email_hash = %hash_for_correlation(email))
    )]
    pub async fn register(&self, email: &str, password: &str) -> Result<i64, SsoError> {
        let result = async {
            let pass_hash = hash_password_blocking(password.to_string(), self.bcrypt_cost).await?;
            self.users
                .save_user(email, &pass_hash)
                .await
                .map_err(SsoError::from_store)
        }
        .await;

        match &result {
            Ok(user_id) => {
                metrics::record_registration("success");
                tracing::info!(target: "sso.service.auth", user_id = *user_id, "User registered");
            }
            Err(e) => {
                metrics::record_registration("error");
                tracing::info!(target: "sso.service.auth", error = %e, "Registration failed");
            }
        }
        result.map_err(|e| record_failure("register", e))
    }

    /// Look up a user's id by email.
    #[instrument(
        skip_all,
        name = "sso.service.get_user_id",
        fields(email_hash = %hash_for_correlation(email))
    )]
    pub async fn get_user_id(&self, email: &str) -> Result<i64, SsoError> {
        self.users
            .get_user(email)
            .await
            .map(|u| u.id)
            .map_err(not_found_as_invalid_credentials)
            .map_err(|e| record_failure("get_user_id", e))
    }

    /// Whether `user_id` is an admin of `app`.
    #[instrument(skip_all, name = "sso.service.auth_is_admin", fields(user_id = user_id, app = %app))]
    pub async fn is_admin(&self, user_id: i64, app: &AppRef) -> Result<bool, SsoError> {
        let result = async {
            let Some((user_id, app_id)) =
                resolve_role_target(self.users.as_ref(), self.apps.as_ref(), user_id, app).await?
            else {
                return Ok::<_, SsoError>(false);
            };
            self.ledger
                .is_admin(user_id, app_id)
                .await
                .map_err(SsoError::from_store)
        }
        .await;
        result.map_err(|e| record_failure("is_admin", e))
    }
}
