//! # SSO Test Utilities
//!
//! Shared test utilities for the SSO service.
//!
//! This crate provides:
//! - Server test harness (`TestSsoServer`, a real gRPC server over the
//!   in-memory store)
//! - Fixtures (fixed test identities and seeding helpers)
//! - Test data builders (`TestTokenBuilder` for hand-signed tokens)
//! - Custom assertions (`TokenAssertions`, `StatusAssertions`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sso_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestSsoServer::spawn().await?;
//!     let mut auth = server.auth_client().await?;
//!
//!     let user_id = register_user(&mut auth, TEST_EMAIL, TEST_PASSWORD).await?;
//!     assert_eq!(user_id, 1);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
pub use server_harness::*;
pub use token_builders::*;
