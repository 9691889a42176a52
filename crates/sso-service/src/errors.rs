//! Error types for the SSO core.
//!
//! Errors are layered and every boundary translates explicitly:
//!
//! - [`StoreError`]: storage-local kinds produced by repository adapters.
//! - [`SsoError`]: domain kinds produced by services and the authorization gate.
//! - [`tonic::Status`]: transport status built by `From<SsoError>`.
//!
//! A `StoreError` never crosses into the transport layer; services map it
//! with [`SsoError::from_store`] or a per-operation match.

use std::fmt;
use thiserror::Error;
use tonic::Status;

/// Entity kinds a storage lookup can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    App,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::User => f.write_str("user"),
            Entity::App => f.write_str("app"),
        }
    }
}

/// Storage-local error kinds.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(Entity),

    #[error("user already exists")]
    UserExists,

    #[error("app already exists")]
    AppExists,

    #[error("app already has a creator")]
    CreatorExists,

    /// Backend failure (connectivity, constraint we did not expect, aborted
    /// transaction). Carries the driver message for server-side logs only.
    #[error("Database error: {0}")]
    Database(String),
}

/// Domain error kinds visible to callers of the services.
#[derive(Debug, Error)]
pub enum SsoError {
    /// Wrong password, unknown email or unknown app. Deliberately does not
    /// say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user already exists")]
    UserExists,

    #[error("app already exists")]
    AppExists,

    /// Authenticated, but not the creator of the target app.
    #[error("permission denied")]
    PermissionDenied,

    /// Missing or malformed bearer metadata.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Signature mismatch, malformed structure, mistyped claims or expiry.
    #[error("invalid token")]
    InvalidToken,

    #[error("internal error: {0}")]
    Internal(String),
}

impl SsoError {
    /// Default storage → domain mapping.
    ///
    /// Login, the gate and role queries handle `NotFound` themselves before
    /// falling back to this.
    pub fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => SsoError::InvalidCredentials,
            StoreError::UserExists => SsoError::UserExists,
            StoreError::AppExists => SsoError::AppExists,
            // Only reachable by bypassing create_app_with_creator.
            StoreError::CreatorExists => {
                SsoError::Internal("app already has a creator".to_string())
            }
            StoreError::Database(msg) => SsoError::Internal(msg),
        }
    }

    /// Bounded label for metrics.
    pub fn error_type_label(&self) -> &'static str {
        match self {
            SsoError::InvalidCredentials => "invalid_credentials",
            SsoError::UserExists => "user_exists",
            SsoError::AppExists => "app_exists",
            SsoError::PermissionDenied => "permission_denied",
            SsoError::Unauthenticated(_) => "unauthenticated",
            SsoError::InvalidToken => "invalid_token",
            SsoError::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for SsoError {
    fn from(err: StoreError) -> Self {
        SsoError::from_store(err)
    }
}

impl From<SsoError> for Status {
    fn from(err: SsoError) -> Self {
        match err {
            SsoError::InvalidCredentials => Status::invalid_argument("invalid credentials"),
            SsoError::UserExists => Status::already_exists("user already exists"),
            SsoError::AppExists => Status::already_exists("app already exists"),
            SsoError::PermissionDenied => Status::permission_denied("you are not the app creator"),
            SsoError::Unauthenticated(reason) => Status::unauthenticated(reason),
            SsoError::InvalidToken => Status::unauthenticated("invalid token"),
            SsoError::Internal(detail) => {
                tracing::error!(target: "sso.errors", error = %detail, "Internal error");
                Status::internal("internal error")
            }
        }
    }
}
