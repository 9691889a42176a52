//! Builder patterns for test data construction
//!
//! Provides a fluent API for hand-signing session tokens, including
//! malformed ones the service never mints itself.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

/// Builder for HS256 session tokens.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user(1)
///     .for_app(1)
///     .expires_in(-10)
///     .sign("secret1");
/// ```
pub struct TestTokenBuilder {
    uid: Value,
    email: String,
    app_id: i64,
    exp: i64,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults (uid 1, app 1, one hour).
    pub fn new() -> Self {
        Self {
            uid: json!(1),
            email: "a@test.com".to_string(),
            app_id: 1,
            exp: (Utc::now() + Duration::seconds(3600)).timestamp(),
        }
    }

    /// Set the user id claim.
    pub fn for_user(mut self, uid: u64) -> Self {
        self.uid = json!(uid);
        self
    }

    /// Set the user id claim to an arbitrary JSON value.
    pub fn with_raw_uid(mut self, uid: Value) -> Self {
        self.uid = uid;
        self
    }

    /// Set the email claim.
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    /// Set the app id claim.
    pub fn for_app(mut self, app_id: i64) -> Self {
        self.app_id = app_id;
        self
    }

    /// Set expiration in seconds from now (negative means already expired).
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Build the claims as a JSON value.
    pub fn build(self) -> Value {
        json!({
            "uid": self.uid,
            "email": self.email,
            "app_id": self.app_id,
            "exp": self.exp,
        })
    }

    /// Sign the claims with `secret` using HS256.
    pub fn sign(self, secret: &str) -> String {
        encode(
            &Header::default(),
            &self.build(),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("signing test token")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
