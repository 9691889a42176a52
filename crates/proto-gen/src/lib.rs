//! Protocol definitions for the SSO gRPC API.
//!
//! Messages are declared in `sso/messages.rs` with prost derives; the `Auth`,
//! `Permissions` and `Apps` client/server stubs are generated by the build
//! script and included into the same module.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)] // Generated code has various doc formatting

// Re-export prost traits for convenience
pub use prost::Message;

pub mod sso {
    //! Messages and services of the `sso` package.
    #![allow(clippy::all, clippy::pedantic)]

    mod messages;
    pub use messages::*;

    include!(concat!(env!("OUT_DIR"), "/sso.Auth.rs"));
    include!(concat!(env!("OUT_DIR"), "/sso.Permissions.rs"));
    include!(concat!(env!("OUT_DIR"), "/sso.Apps.rs"));
}
