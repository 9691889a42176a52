//! Creator authorization for privileged requests.
//!
//! The gate answers "is the caller the creator of app X?". It never mutates
//! state. A `false` answer is not a gate failure; callers turn it into
//! [`SsoError::PermissionDenied`] via [`AuthorizationGate::require_creator`].

use crate::crypto;
use crate::errors::{SsoError, StoreError};
use crate::models::{App, AppRef, Caller};
use crate::observability::metrics;
use crate::repositories::{AppRegistry, PermissionLedger};
use std::sync::Arc;
use tonic::metadata::MetadataMap;
use tracing::instrument;

/// Metadata key carrying the bearer credential.
pub const AUTHORIZATION_KEY: &str = "authorization";

/// Required prefix of the authorization value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token from request metadata.
///
/// Fails with [`SsoError::Unauthenticated`] when the `authorization` entry is
/// missing, repeated, not ASCII, lacks the `"Bearer "` prefix, or carries an
/// empty token.
pub fn extract_bearer(metadata: &MetadataMap) -> Result<String, SsoError> {
    let mut values = metadata.get_all(AUTHORIZATION_KEY).iter();

    let value = values.next().ok_or_else(|| {
        tracing::debug!(target: "sso.service.gate", "Missing authorization metadata");
        SsoError::Unauthenticated("missing authorization metadata".to_string())
    })?;

    if values.next().is_some() {
        tracing::debug!(target: "sso.service.gate", "Repeated authorization metadata");
        return Err(SsoError::Unauthenticated(
            "multiple authorization entries".to_string(),
        ));
    }

    let raw = value.to_str().map_err(|_| {
        SsoError::Unauthenticated("invalid authorization encoding".to_string())
    })?;

    let token = raw.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        tracing::debug!(target: "sso.service.gate", "Invalid authorization format");
        SsoError::Unauthenticated("invalid authorization format".to_string())
    })?;

    if token.is_empty() {
        return Err(SsoError::Unauthenticated("empty bearer token".to_string()));
    }

    Ok(token.to_string())
}

/// Result of a successful gate check.
#[derive(Debug, Clone)]
pub struct CreatorCheck {
    /// Verified caller identity.
    pub caller: Caller,
    /// The resolved target app.
    pub app: App,
    /// Whether the caller is the app's creator.
    pub is_creator: bool,
}

/// Verifies bearer tokens against the target app's secret and resolves the
/// caller's creator status.
#[derive(Clone)]
pub struct AuthorizationGate {
    apps: Arc<dyn AppRegistry>,
    ledger: Arc<dyn PermissionLedger>,
}

impl AuthorizationGate {
    pub fn new(apps: Arc<dyn AppRegistry>, ledger: Arc<dyn PermissionLedger>) -> Self {
        Self { apps, ledger }
    }

    /// Run every gate step against request metadata.
    pub async fn check(
        &self,
        metadata: &MetadataMap,
        target: &AppRef,
    ) -> Result<CreatorCheck, SsoError> {
        let token = extract_bearer(metadata)?;
        self.check_token(&token, target).await
    }

    /// Resolve the target app, verify the token with its secret, and query
    /// creator status.
    ///
    /// An unknown app, a token that fails verification, or a token issued
    /// for a different app all fail with [`SsoError::InvalidCredentials`].
    #[instrument(skip_all, name = "sso.service.gate.check")]
    pub async fn check_token(
        &self,
        token: &str,
        target: &AppRef,
    ) -> Result<CreatorCheck, SsoError> {
        let app = self.apps.get_app(target).await.map_err(|e| match e {
            StoreError::NotFound(_) => SsoError::InvalidCredentials,
            other => SsoError::from_store(other),
        })?;

        let claims = crypto::verify_token(token, &app.secret).map_err(|e| match e {
            SsoError::InvalidToken => SsoError::InvalidCredentials,
            other => other,
        })?;

        if claims.app_id != app.id {
            tracing::debug!(
                target: "sso.service.gate",
                token_app_id = claims.app_id,
                app_id = app.id,
                "Token issued for a different app"
            );
            return Err(SsoError::InvalidCredentials);
        }

        let user_id = claims
            .user_id()
            .map_err(|_| SsoError::InvalidCredentials)?;

        let is_creator = self
            .ledger
            .is_creator(user_id, app.id)
            .await
            .map_err(SsoError::from_store)?;

        Ok(CreatorCheck {
            caller: Caller {
                user_id,
                app_id: app.id,
            },
            app,
            is_creator,
        })
    }

    /// Like [`check`](Self::check), but a non-creator caller fails with
    /// [`SsoError::PermissionDenied`].
    pub async fn require_creator(
        &self,
        metadata: &MetadataMap,
        target: &AppRef,
        operation: &'static str,
    ) -> Result<CreatorCheck, SsoError> {
        let outcome = self.check(metadata, target).await;

        let (label, result) = match outcome {
            Ok(check) if check.is_creator => ("allowed", Ok(check)),
            Ok(check) => {
                tracing::warn!(
                    target: "sso.service.gate",
                    operation = operation,
                    user_id = check.caller.user_id,
                    app_id = check.app.id,
                    "Caller is not the app creator"
                );
                ("denied", Err(SsoError::PermissionDenied))
            }
            Err(e) => {
                let label = match e {
                    SsoError::Unauthenticated(_) => "unauthenticated",
                    SsoError::Internal(_) => "error",
                    _ => "rejected",
                };
                (label, Err(e))
            }
        };

        metrics::record_authorization_decision(operation, label);
        result
    }
}
