//! Metrics definitions for the SSO service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `sso_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded by code:
//! - `status`: success, error
//! - `operation`: one value per RPC (login, register, set_admin, ...)
//! - `outcome`: allowed, denied, unauthenticated, rejected, error
//! - `error_type`: [`crate::errors::SsoError::error_type_label`] values
//! - `table`: users, apps, admins, creators

use metrics::{counter, histogram};
use std::time::Duration;

/// Record a login attempt.
///
/// Metric: `sso_login_total`
/// Labels: `status`
pub fn record_login(status: &str) {
    counter!("sso_login_total", "status" => status.to_string()).increment(1);
}

/// Record a registration attempt.
///
/// Metric: `sso_registration_total`
/// Labels: `status`
pub fn record_registration(status: &str) {
    counter!("sso_registration_total", "status" => status.to_string()).increment(1);
}

/// Record an authorization gate decision.
///
/// Metric: `sso_authorization_decisions_total`
/// Labels: `operation`, `outcome`
pub fn record_authorization_decision(operation: &str, outcome: &str) {
    counter!("sso_authorization_decisions_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a token verification result.
///
/// Metric: `sso_token_verifications_total`
/// Labels: `status`
pub fn record_token_verification(status: &str) {
    counter!("sso_token_verifications_total", "status" => status.to_string()).increment(1);
}

/// Record an error returned by a service operation.
///
/// Metric: `sso_errors_total`
/// Labels: `operation`, `error_type`
pub fn record_error(operation: &str, error_type: &str) {
    counter!("sso_errors_total",
        "operation" => operation.to_string(),
        "error_type" => error_type.to_string()
    )
    .increment(1);
}

/// Record database query execution.
///
/// Metric: `sso_db_query_duration_seconds`
/// Labels: `operation`, `table`
pub fn record_db_query(operation: &str, table: &str, duration: Duration) {
    histogram!("sso_db_query_duration_seconds",
        "operation" => operation.to_string(),
        "table" => table.to_string()
    )
    .record(duration.as_secs_f64());
}
