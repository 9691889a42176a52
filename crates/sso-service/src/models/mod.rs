//! Domain entities shared by repositories and services.

use secrecy::SecretString;
use std::fmt;

/// A registered user.
///
/// `pass_hash` holds the bcrypt hash bytes exactly as stored.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub pass_hash: Vec<u8>,
}

/// Custom Debug implementation that redacts the email and password hash.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &"[REDACTED]")
            .field("pass_hash", &"[REDACTED]")
            .finish()
    }
}

/// A registered application.
///
/// `secret` is the HMAC key for the app's session tokens. Rotating it
/// invalidates every outstanding token for the app.
#[derive(Clone, Debug)]
pub struct App {
    pub id: i64,
    pub name: String,
    pub secret: SecretString,
}

/// How a caller names an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRef {
    Id(i64),
    Name(String),
}

impl fmt::Display for AppRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppRef::Id(id) => write!(f, "id={}", id),
            AppRef::Name(name) => write!(f, "name={}", name),
        }
    }
}

/// Identity of an authenticated caller, resolved by the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub app_id: i64,
}
