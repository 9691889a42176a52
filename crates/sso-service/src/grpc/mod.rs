//! gRPC transport.
//!
//! Handlers validate the request, call into `services`, and convert
//! [`SsoError`](crate::errors::SsoError) into `tonic::Status` via `?`.

pub mod apps;
pub mod auth;
pub mod permissions;
pub mod validation;

pub use apps::AppsGrpc;
pub use auth::AuthGrpc;
pub use permissions::PermissionsGrpc;

use crate::repositories::{AppRegistry, CredentialStore, PermissionLedger};
use crate::services::{AppService, AuthService, PermissionService};
use proto_gen::sso::{
    apps_server::AppsServer, auth_server::AuthServer, permissions_server::PermissionsServer,
};
use std::sync::Arc;
use std::time::Duration;
use tonic::transport::server::Router;
use tonic::transport::Server;
use tonic::Status;

/// The three SSO services wired over one storage backend.
#[derive(Clone)]
pub struct SsoServices {
    pub auth: AuthService,
    pub permissions: PermissionService,
    pub apps: AppService,
}

impl SsoServices {
    /// Wire every service over `store`, which provides all storage
    /// capabilities.
    pub fn new<S>(store: S, token_ttl: Duration, bcrypt_cost: u32) -> Self
    where
        S: CredentialStore + AppRegistry + PermissionLedger + Clone + 'static,
    {
        let users: Arc<dyn CredentialStore> = Arc::new(store.clone());
        let apps: Arc<dyn AppRegistry> = Arc::new(store.clone());
        let ledger: Arc<dyn PermissionLedger> = Arc::new(store);

        Self {
            auth: AuthService::new(
                users.clone(),
                apps.clone(),
                ledger.clone(),
                token_ttl,
                bcrypt_cost,
            ),
            permissions: PermissionService::new(users.clone(), apps.clone(), ledger.clone()),
            apps: AppService::new(users, apps, ledger),
        }
    }

    /// Register the `Auth`, `Permissions` and `Apps` services on `server`.
    pub fn add_to(&self, server: &mut Server) -> Router {
        server
            .add_service(AuthServer::new(AuthGrpc::new(self.auth.clone())))
            .add_service(PermissionsServer::new(PermissionsGrpc::new(
                self.permissions.clone(),
            )))
            .add_service(AppsServer::new(AppsGrpc::new(self.apps.clone())))
    }
}

/// Widen a stored user id for the wire.
#[expect(
    clippy::result_large_err,
    reason = "Status is the standard gRPC error type"
)]
pub(crate) fn wire_user_id(id: i64) -> Result<u64, Status> {
    u64::try_from(id).map_err(|_| {
        tracing::error!(target: "sso.grpc", user_id = id, "Stored user id is negative");
        Status::internal("internal error")
    })
}
