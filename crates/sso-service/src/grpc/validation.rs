//! Request validation at the transport boundary.
//!
//! Handlers collect every failing field before rejecting, so a client sees
//! all of its mistakes in one `InvalidArgument` status:
//!
//! ```text
//! field email is not a valid email, field password is a required field
//! ```

use crate::models::AppRef;
use tonic::Status;

/// Maximum accepted email length (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// Basic email format check: `local@domain.tld`.
///
/// Rejects whitespace, a missing or repeated `@`, and domains without a dot
/// or with empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let mut labels = domain.split('.');
    let first = labels.next().unwrap_or_default();
    let mut rest = labels.peekable();
    if first.is_empty() || rest.peek().is_none() {
        return false;
    }
    rest.all(|label| !label.is_empty())
}

/// Collects field-level problems for one request.
#[derive(Debug, Default)]
pub struct RequestValidator {
    problems: Vec<String>,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The field must be a non-empty string.
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.is_empty() {
            self.problems
                .push(format!("field {} is a required field", field));
        }
        self
    }

    /// The field must be present and a well-formed email.
    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if value.is_empty() {
            self.problems
                .push(format!("field {} is a required field", field));
        } else if !is_valid_email(value) {
            self.problems
                .push(format!("field {} is not a valid email", field));
        }
        self
    }

    /// Narrow a wire user id. Zero counts as unset.
    pub fn user_id(&mut self, field: &str, value: u64) -> Option<i64> {
        if value == 0 {
            self.problems
                .push(format!("field {} is a required field", field));
            return None;
        }
        match i64::try_from(value) {
            Ok(id) => Some(id),
            Err(_) => {
                self.problems.push(format!("field {} is out of range", field));
                None
            }
        }
    }

    /// Build the application reference from the `app_id` / `app_name` pair.
    ///
    /// Exactly one must be set; `0` and `""` count as unset.
    pub fn app_ref(&mut self, app_id: i64, app_name: &str) -> Option<AppRef> {
        match (app_id, app_name.is_empty()) {
            (0, true) => {
                self.problems
                    .push("field app_id or app_name is a required field".to_string());
                None
            }
            (0, false) => Some(AppRef::Name(app_name.to_string())),
            (id, true) if id > 0 => Some(AppRef::Id(id)),
            (_, true) => {
                self.problems
                    .push("field app_id must be positive".to_string());
                None
            }
            (_, false) => {
                self.problems
                    .push("fields app_id and app_name are mutually exclusive".to_string());
                None
            }
        }
    }

    /// Reject with every collected problem, or succeed.
    #[expect(
        clippy::result_large_err,
        reason = "Status is the standard gRPC error type"
    )]
    pub fn finish(&self) -> Result<(), Status> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                target: "sso.grpc.validation",
                problems = self.problems.len(),
                "Request rejected"
            );
            Err(Status::invalid_argument(self.problems.join(", ")))
        }
    }

    /// Like [`finish`](Self::finish), yielding a value parsed along the way.
    #[expect(
        clippy::result_large_err,
        reason = "Status is the standard gRPC error type"
    )]
    pub fn finish_with<T>(&self, value: Option<T>) -> Result<T, Status> {
        self.finish()?;
        value.ok_or_else(|| Status::invalid_argument("invalid request"))
    }
}
