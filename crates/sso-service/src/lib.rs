//! SSO Service Library
//!
//! Multi-tenant single sign-on: users register once, log in to any registered
//! application, and receive a session token signed with that application's
//! secret. Applications have exactly one creator, who may rename or delete the
//! application and grant or revoke its admins.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Password hashing and session tokens
//! - `errors` - Error types and their gRPC status mapping
//! - `grpc` - `sso.Auth`, `sso.Permissions` and `sso.Apps` handlers
//! - `models` - Data models
//! - `observability` - Metrics and log correlation
//! - `repositories` - Storage capabilities (Postgres and in-memory)
//! - `services` - Business logic layer

pub mod config;
pub mod crypto;
pub mod errors;
pub mod grpc;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;
