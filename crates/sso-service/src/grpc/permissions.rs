//! `sso.Permissions` handlers.
//!
//! `SetAdmin` and `DelAdmin` are privileged: the bearer token in request
//! metadata must belong to the target app's creator.

use super::validation::RequestValidator;
use crate::services::PermissionService;
use proto_gen::sso::{
    permissions_server::Permissions, DelAdminRequest, DelAdminResponse, IsAdminRequest,
    IsAdminResponse, IsCreatorRequest, IsCreatorResponse, SetAdminRequest, SetAdminResponse,
};
use tonic::{Request, Response, Status};
use tracing::instrument;

/// gRPC adapter over [`PermissionService`].
#[derive(Clone)]
pub struct PermissionsGrpc {
    service: PermissionService,
}

impl PermissionsGrpc {
    pub fn new(service: PermissionService) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl Permissions for PermissionsGrpc {
    #[instrument(skip_all, name = "sso.grpc.set_admin")]
    async fn set_admin(
        &self,
        request: Request<SetAdminRequest>,
    ) -> Result<Response<SetAdminResponse>, Status> {
        let (metadata, _, req) = request.into_parts();

        let mut v = RequestValidator::new();
        v.email("email", &req.email);
        let app = v.app_ref(req.app_id, &req.app_name);
        let app = v.finish_with(app)?;

        let set_admin = self.service.set_admin(&metadata, &req.email, &app).await?;
        Ok(Response::new(SetAdminResponse { set_admin }))
    }

    #[instrument(skip_all, name = "sso.grpc.del_admin")]
    async fn del_admin(
        &self,
        request: Request<DelAdminRequest>,
    ) -> Result<Response<DelAdminResponse>, Status> {
        let (metadata, _, req) = request.into_parts();

        let mut v = RequestValidator::new();
        v.email("email", &req.email);
        let app = v.app_ref(req.app_id, &req.app_name);
        let app = v.finish_with(app)?;

        let del_admin = self.service.del_admin(&metadata, &req.email, &app).await?;
        Ok(Response::new(DelAdminResponse { del_admin }))
    }

    #[instrument(skip_all, name = "sso.grpc.is_admin")]
    async fn is_admin(
        &self,
        request: Request<IsAdminRequest>,
    ) -> Result<Response<IsAdminResponse>, Status> {
        let req = request.into_inner();

        let mut v = RequestValidator::new();
        let user_id = v.user_id("user_id", req.user_id);
        let app = v.app_ref(req.app_id, &req.app_name);
        let (user_id, app) = v.finish_with(user_id.zip(app))?;

        let is_admin = self.service.is_admin(user_id, &app).await?;
        Ok(Response::new(IsAdminResponse { is_admin }))
    }

    #[instrument(skip_all, name = "sso.grpc.is_creator")]
    async fn is_creator(
        &self,
        request: Request<IsCreatorRequest>,
    ) -> Result<Response<IsCreatorResponse>, Status> {
        let req = request.into_inner();

        let mut v = RequestValidator::new();
        let user_id = v.user_id("user_id", req.user_id);
        let app = v.app_ref(req.app_id, &req.app_name);
        let (user_id, app) = v.finish_with(user_id.zip(app))?;

        let is_creator = self.service.is_creator(user_id, &app).await?;
        Ok(Response::new(IsCreatorResponse { is_creator }))
    }
}
