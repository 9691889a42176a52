//! Admin grant/revoke (creator-gated) and role queries.

use super::authorization_gate::AuthorizationGate;
use super::{not_found_as_invalid_credentials, record_failure, resolve_role_target};
use crate::errors::SsoError;
use crate::models::AppRef;
use crate::observability::hash_for_correlation;
use crate::repositories::{AppRegistry, CredentialStore, PermissionLedger};
use std::sync::Arc;
use tonic::metadata::MetadataMap;
use tracing::instrument;

/// Permission use cases.
#[derive(Clone)]
pub struct PermissionService {
    users: Arc<dyn CredentialStore>,
    apps: Arc<dyn AppRegistry>,
    ledger: Arc<dyn PermissionLedger>,
    gate: AuthorizationGate,
}

impl PermissionService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        apps: Arc<dyn AppRegistry>,
        ledger: Arc<dyn PermissionLedger>,
    ) -> Self {
        let gate = AuthorizationGate::new(apps.clone(), ledger.clone());
        Self {
            users,
            apps,
            ledger,
            gate,
        }
    }

    /// Grant admin on `app` to the user registered under `email`.
    ///
    /// The caller must be the app's creator. Authorization is checked before
    /// the target user is looked up, so unauthenticated callers learn nothing
    /// about which emails exist.
    #[instrument(
        skip_all,
        name = "sso.service.set_admin",
        fields(email_hash = %hash_for_correlation(email), app = %app)
    )]
    pub async fn set_admin(
        &self,
        metadata: &MetadataMap,
        email: &str,
        app: &AppRef,
    ) -> Result<bool, SsoError> {
        let result = async {
            let check = self.gate.require_creator(metadata, app, "set_admin").await?;
            let target = self
                .users
                .get_user(email)
                .await
                .map_err(not_found_as_invalid_credentials)?;
            self.ledger
                .set_admin(target.id, check.app.id)
                .await
                .map_err(not_found_as_invalid_credentials)?;

            tracing::info!(
                target: "sso.service.permissions",
                granted_by = check.caller.user_id,
                user_id = target.id,
                app_id = check.app.id,
                "Admin granted"
            );
            Ok::<_, SsoError>(true)
        }
        .await;
        result.map_err(|e| record_failure("set_admin", e))
    }

    /// Revoke admin on `app` from the user registered under `email`.
    #[instrument(
        skip_all,
        name = "sso.service.del_admin",
        fields(email_hash = %hash_for_correlation(email), app = %app)
    )]
    pub async fn del_admin(
        &self,
        metadata: &MetadataMap,
        email: &str,
        app: &AppRef,
    ) -> Result<bool, SsoError> {
        let result = async {
            let check = self.gate.require_creator(metadata, app, "del_admin").await?;
            let target = self
                .users
                .get_user(email)
                .await
                .map_err(not_found_as_invalid_credentials)?;
            self.ledger
                .del_admin(target.id, check.app.id)
                .await
                .map_err(not_found_as_invalid_credentials)?;

            tracing::info!(
                target: "sso.service.permissions",
                revoked_by = check.caller.user_id,
                user_id = target.id,
                app_id = check.app.id,
                "Admin revoked"
            );
            Ok::<_, SsoError>(true)
        }
        .await;
        result.map_err(|e| record_failure("del_admin", e))
    }

    /// Whether `user_id` is an admin of `app`. Not gated.
    #[instrument(skip_all, name = "sso.service.is_admin", fields(user_id = user_id, app = %app))]
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

    /// Whether `user_id` created `app`. Not gated.
    #[instrument(skip_all, name = "sso.service.is_creator", fields(user_id = user_id, app = %app))]
    pub async fn is_creator(&self, user_id: i64, app: &AppRef) -> Result<bool, SsoError> {
        let result = async {
            let Some((user_id, app_id)) =
                resolve_role_target(self.users.as_ref(), self.apps.as_ref(), user_id, app).await?
            else {
                return Ok::<_, SsoError>(false);
            };
            self.ledger
                .is_creator(user_id, app_id)
                .await
                .map_err(SsoError::from_store)
        }
        .await;
        result.map_err(|e| record_failure("is_creator", e))
    }
}
