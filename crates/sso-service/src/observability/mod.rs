//! Observability for the SSO service.
//!
//! # Privacy by Default
//!
//! Service entry points use `#[instrument(skip_all)]` and record fields
//! explicitly. Fields fall into three groups:
//! - **SAFE**: logged in plaintext (operation names, numeric ids, outcomes)
//! - **HASHED**: SHA-256 correlation hash only (emails)
//! - **NEVER**: must not appear in logs (passwords, hashes, app secrets, tokens)

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// One-way hash for correlating log lines about the same email. Not a
/// substitute for protecting secrets.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.get(..4).unwrap_or_default())
}
