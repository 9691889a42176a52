//! Application lifecycle: lookup, create, rename/rotate, delete.

use super::authorization_gate::AuthorizationGate;
use super::{not_found_as_invalid_credentials, record_failure};
use crate::errors::{SsoError, StoreError};
use crate::models::{App, AppRef};
use crate::observability::hash_for_correlation;
use crate::repositories::{AppRegistry, CredentialStore, PermissionLedger};
use secrecy::SecretString;
use std::sync::Arc;
use tonic::metadata::MetadataMap;
use tracing::instrument;

/// Application use cases.
#[derive(Clone)]
pub struct AppService {
    users: Arc<dyn CredentialStore>,
    apps: Arc<dyn AppRegistry>,
    gate: AuthorizationGate,
}

impl AppService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        apps: Arc<dyn AppRegistry>,
        ledger: Arc<dyn PermissionLedger>,
    ) -> Self {
        let gate = AuthorizationGate::new(apps.clone(), ledger);
        Self { users, apps, gate }
    }

    /// Public lookup of an app's id by name.
    #[instrument(skip_all, name = "sso.service.get_app_id", fields(app_name = %name))]
    pub async fn get_app_id(&self, name: &str) -> Result<(i64, String), SsoError> {
        self.apps
            .get_app_by_name(name)
            .await
            .map(|app: App| (app.id, app.name))
            .map_err(not_found_as_invalid_credentials)
            .map_err(|e| record_failure("get_app_id", e))
    }

    /// Create an app owned by the user registered under `email`.
    ///
    /// The app row, the creator relation and the creator's admin relation
    /// are written in one atomic storage operation.
    #[instrument(
        skip_all,
        name = "sso.service.set_app",
        fields(email_hash = %hash_for_correlation(email), app_name = %name)
    )]
    pub async fn set_app(
        &self,
        email: &str,
        name: &str,
        secret: &SecretString,
    ) -> Result<i64, SsoError> {
        let result = async {
            let creator = self
                .users
                .get_user(email)
                .await
                .map_err(not_found_as_invalid_credentials)?;

            let app_id = self
                .apps
                .create_app_with_creator(name, secret, creator.id)
                .await
                .map_err(|e| match e {
                    // The creator vanished between lookup and insert.
                    StoreError::NotFound(_) => SsoError::InvalidCredentials,
                    other => SsoError::from_store(other),
                })?;

            tracing::info!(
                target: "sso.service.apps",
                app_id = app_id,
                creator_id = creator.id,
                "App registered"
            );
            Ok::<_, SsoError>(app_id)
        }
        .await;
        result.map_err(|e| record_failure("set_app", e))
    }

    /// Rename `name` to `new_name` and replace its secret. Creator only.
    ///
    /// Rotating the secret invalidates every outstanding token for the app,
    /// including the caller's.
    #[instrument(
        skip_all,
        name = "sso.service.upd_app",
        fields(app_name = %name, new_app_name = %new_name)
    )]
    pub async fn upd_app(
        &self,
        metadata: &MetadataMap,
        name: &str,
        new_name: &str,
        new_secret: &SecretString,
    ) -> Result<bool, SsoError> {
        let result = async {
            let check = self
                .gate
                .require_creator(metadata, &AppRef::Name(name.to_string()), "upd_app")
                .await?;

            self.apps
                .update_app(check.app.id, new_name, new_secret)
                .await
                .map_err(not_found_as_invalid_credentials)?;

            tracing::info!(
                target: "sso.service.apps",
                app_id = check.app.id,
                user_id = check.caller.user_id,
                "App updated"
            );
            Ok::<_, SsoError>(true)
        }
        .await;
        result.map_err(|e| record_failure("upd_app", e))
    }

    /// Delete `name` and every relation referencing it. Creator only.
    #[instrument(skip_all, name = "sso.service.del_app", fields(app_name = %name))]
    pub async fn del_app(&self, metadata: &MetadataMap, name: &str) -> Result<bool, SsoError> {
        let result = async {
            let check = self
                .gate
                .require_creator(metadata, &AppRef::Name(name.to_string()), "del_app")
                .await?;

            self.apps
                .delete_app(check.app.id)
                .await
                .map_err(not_found_as_invalid_credentials)?;

            tracing::info!(
                target: "sso.service.apps",
                app_id = check.app.id,
                user_id = check.caller.user_id,
                "App deleted"
            );
            Ok::<_, SsoError>(true)
        }
        .await;
        result.map_err(|e| record_failure("del_app", e))
    }
}
