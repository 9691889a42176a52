//! Password hashing and session token minting/verification.
//!
//! Session tokens are HS256 JWTs signed with the issuing app's secret. They
//! are never persisted; validity is decided entirely by the signature and
//! the `exp` claim.

use crate::config::BCRYPT_COST_RANGE;
use crate::errors::SsoError;
use crate::models::{App, User};
use crate::observability::metrics::record_token_verification;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::instrument;

/// Maximum accepted token size in bytes.
///
/// Checked before any decoding or signature work.
pub const MAX_TOKEN_SIZE_BYTES: usize = 4096;

/// bcrypt hash verified when a login names an unknown email, so that the
/// unknown-email and wrong-password branches do the same work.
pub const DUMMY_HASH: &str = "$2b$10$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Session token claims.
///
/// `uid` is decoded as `u64`, so a negative, fractional or string value fails
/// deserialization instead of being coerced.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: u64,
    pub email: String,
    pub app_id: i64,
    pub exp: i64,
}

/// Custom Debug implementation that redacts the email.
impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("uid", &self.uid)
            .field("email", &"[REDACTED]")
            .field("app_id", &self.app_id)
            .field("exp", &self.exp)
            .finish()
    }
}

impl SessionClaims {
    /// The caller's user id as stored. A `uid` outside the storage range
    /// cannot belong to a real user and is rejected.
    pub fn user_id(&self) -> Result<i64, SsoError> {
        i64::try_from(self.uid).map_err(|_| SsoError::InvalidToken)
    }
}

/// Mint a session token for `user` on `app`, valid for `ttl`.
///
/// A zero `ttl` produces a token that is already expired.
#[instrument(skip_all, fields(app_id = app.id, user_id = user.id))]
pub fn mint_token(user: &User, app: &App, ttl: Duration) -> Result<String, SsoError> {
    let uid = u64::try_from(user.id)
        .map_err(|_| SsoError::Internal(format!("negative user id {}", user.id)))?;
    let ttl_secs = i64::try_from(ttl.as_secs())
        .map_err(|_| SsoError::Internal("token ttl out of range".to_string()))?;
    let exp = chrono::Utc::now()
        .timestamp()
        .checked_add(ttl_secs)
        .ok_or_else(|| SsoError::Internal("token expiry overflow".to_string()))?;

    let claims = SessionClaims {
        uid,
        email: user.email.clone(),
        app_id: app.id,
        exp,
    };

    let key = EncodingKey::from_secret(app.secret.expose_secret().as_bytes());
    encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| SsoError::Internal(format!("Token signing failed: {}", e)))
}

/// Verify a session token against an app secret.
///
/// Fails with [`SsoError::InvalidToken`] on oversize input, malformed
/// structure, signature mismatch, mistyped claims, or `exp <= now`.
#[instrument(skip_all)]
pub fn verify_token(token: &str, secret: &SecretString) -> Result<SessionClaims, SsoError> {
    let result = decode_claims(token, secret);
    record_token_verification(if result.is_ok() { "success" } else { "error" });
    result
}

fn decode_claims(token: &str, secret: &SecretString) -> Result<SessionClaims, SsoError> {
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        tracing::debug!(
            target: "sso.crypto",
            token_size = token.len(),
            max_size = MAX_TOKEN_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(SsoError::InvalidToken);
    }

    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;

    let data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(target: "sso.crypto", error = %e, "Token verification failed");
        SsoError::InvalidToken
    })?;

    // jsonwebtoken accepts exp == now; expiry here is exclusive.
    let now = chrono::Utc::now().timestamp();
    if data.claims.exp <= now {
        tracing::debug!(
            target: "sso.crypto",
            exp = data.claims.exp,
            now = now,
            "Token rejected: expired"
        );
        return Err(SsoError::InvalidToken);
    }

    Ok(data.claims)
}

/// Hash a password with bcrypt at the given cost.
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<Vec<u8>, SsoError> {
    if !BCRYPT_COST_RANGE.contains(&cost) {
        return Err(SsoError::Internal(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost,
            BCRYPT_COST_RANGE.start(),
            BCRYPT_COST_RANGE.end()
        )));
    }

    bcrypt::hash(password, cost)
        .map(String::into_bytes)
        .map_err(|e| SsoError::Internal(format!("Password hashing failed: {}", e)))
}

/// Compare a password against a stored bcrypt hash.
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &[u8]) -> Result<bool, SsoError> {
    let hash = std::str::from_utf8(hash)
        .map_err(|_| SsoError::Internal("Stored password hash is not valid UTF-8".to_string()))?;
    bcrypt::verify(password, hash)
        .map_err(|e| SsoError::Internal(format!("Password verification failed: {}", e)))
}
