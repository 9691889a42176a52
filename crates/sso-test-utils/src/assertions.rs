//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for session tokens and gRPC statuses.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;
use tonic::{Code, Response, Status};

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Session claims structure
#[derive(Debug, Deserialize)]
struct SessionClaims {
    pub uid: u64,
    pub email: String,
    pub app_id: i64,
    pub exp: i64,
}

fn decode_segment(token: &str, index: usize) -> Vec<u8> {
    let parts: Vec<_> = token.split('.').collect();
    URL_SAFE_NO_PAD
        .decode(parts[index])
        .expect("Invalid JWT segment")
}

fn decode_claims(token: &str) -> SessionClaims {
    serde_json::from_slice(&decode_segment(token, 1)).expect("Failed to parse session claims")
}

/// Custom assertions for session tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_user(1)
///     .assert_for_app(1)
///     .assert_expires_in(3600);
/// ```
pub trait TokenAssertions {
    /// Assert that the token is an HS256 JWT with session claims
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token carries the given user id
    fn assert_for_user(&self, uid: u64) -> &Self;

    /// Assert that the token was issued for the given app
    fn assert_for_app(&self, app_id: i64) -> &Self;

    /// Assert that the token carries the given email
    fn assert_for_email(&self, email: &str) -> &Self;

    /// Assert that the token expires within the specified seconds
    fn assert_expires_in(&self, seconds: u64) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header: Result<JwtHeader, _> = serde_json::from_slice(&decode_segment(self, 0));
        assert!(
            header.is_ok(),
            "Failed to parse JWT header JSON: {:?}",
            header.err()
        );
        let header = header.unwrap();
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let claims: Result<SessionClaims, _> = serde_json::from_slice(&decode_segment(self, 1));
        assert!(
            claims.is_ok(),
            "Failed to parse session claims JSON: {:?}",
            claims.err()
        );

        self
    }

    fn assert_for_user(&self, uid: u64) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(claims.uid, uid, "Expected uid {}, got {}", uid, claims.uid);
        self
    }

    fn assert_for_app(&self, app_id: i64) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(
            claims.app_id, app_id,
            "Expected app_id {}, got {}",
            app_id, claims.app_id
        );
        self
    }

    fn assert_for_email(&self, email: &str) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(
            claims.email, email,
            "Expected email '{}', got '{}'",
            email, claims.email
        );
        self
    }

    fn assert_expires_in(&self, seconds: u64) -> &Self {
        let claims = decode_claims(self);
        let now = chrono::Utc::now().timestamp();
        let expires_in = claims.exp - now;

        // Allow 5-second tolerance for slow test machines
        assert!(
            (expires_in - seconds as i64).abs() <= 5,
            "Expected token to expire in {} seconds, but expires in {} seconds",
            seconds,
            expires_in
        );

        self
    }
}

/// Assertions on the outcome of a unary RPC.
pub trait StatusAssertions<T> {
    /// Assert the call failed with `code` and return the status.
    fn assert_code(self, code: Code) -> Status;

    /// Assert the call succeeded and return the message.
    fn assert_ok(self) -> T;
}

impl<T: std::fmt::Debug> StatusAssertions<T> for Result<Response<T>, Status> {
    fn assert_code(self, code: Code) -> Status {
        match self {
            Ok(response) => panic!(
                "Expected status {:?}, got success: {:?}",
                code,
                response.into_inner()
            ),
            Err(status) => {
                assert_eq!(
                    status.code(),
                    code,
                    "Expected status {:?}, got {:?}: {}",
                    code,
                    status.code(),
                    status.message()
                );
                status
            }
        }
    }

    fn assert_ok(self) -> T {
        match self {
            Ok(response) => response.into_inner(),
            Err(status) => panic!(
                "Expected success, got {:?}: {}",
                status.code(),
                status.message()
            ),
        }
    }
}
