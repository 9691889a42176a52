//! `sso.Apps` handlers.

use super::validation::RequestValidator;
use crate::services::AppService;
use proto_gen::sso::{
    apps_server::Apps, DelAppRequest, DelAppResponse, GetAppIdRequest, GetAppIdResponse,
    SetAppRequest, SetAppResponse, UpdAppRequest, UpdAppResponse,
};
use secrecy::SecretString;
use tonic::{Request, Response, Status};
use tracing::instrument;

/// gRPC adapter over [`AppService`].
#[derive(Clone)]
pub struct AppsGrpc {
    service: AppService,
}

impl AppsGrpc {
    pub fn new(service: AppService) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl Apps for AppsGrpc {
    #[instrument(skip_all, name = "sso.grpc.get_app_id")]
    async fn get_app_id(
        &self,
        request: Request<GetAppIdRequest>,
    ) -> Result<Response<GetAppIdResponse>, Status> {
        let req = request.into_inner();

        RequestValidator::new()
            .required("app_name", &req.app_name)
            .finish()?;

        let (app_id, app_name) = self.service.get_app_id(&req.app_name).await?;
        Ok(Response::new(GetAppIdResponse { app_id, app_name }))
    }

    #[instrument(skip_all, name = "sso.grpc.set_app")]
    async fn set_app(
        &self,
        request: Request<SetAppRequest>,
    ) -> Result<Response<SetAppResponse>, Status> {
        let req = request.into_inner();

        RequestValidator::new()
            .email("email", &req.email)
            .required("app_name", &req.app_name)
            .required("app_secret", &req.app_secret)
            .finish()?;

        let secret = SecretString::from(req.app_secret);
        let app_id = self
            .service
            .set_app(&req.email, &req.app_name, &secret)
            .await?;
        Ok(Response::new(SetAppResponse { app_id }))
    }

    #[instrument(skip_all, name = "sso.grpc.upd_app")]
    async fn upd_app(
        &self,
        request: Request<UpdAppRequest>,
    ) -> Result<Response<UpdAppResponse>, Status> {
        let (metadata, _, req) = request.into_parts();

        RequestValidator::new()
            .required("app_name", &req.app_name)
            .required("new_app_name", &req.new_app_name)
            .required("new_app_secret", &req.new_app_secret)
            .finish()?;

        let new_secret = SecretString::from(req.new_app_secret);
        let is_upd_app = self
            .service
            .upd_app(&metadata, &req.app_name, &req.new_app_name, &new_secret)
            .await?;
        Ok(Response::new(UpdAppResponse { is_upd_app }))
    }

    #[instrument(skip_all, name = "sso.grpc.del_app")]
    async fn del_app(
        &self,
        request: Request<DelAppRequest>,
    ) -> Result<Response<DelAppResponse>, Status> {
        let (metadata, _, req) = request.into_parts();

        RequestValidator::new()
            .required("app_name", &req.app_name)
            .finish()?;

        let is_del_app = self.service.del_app(&metadata, &req.app_name).await?;
        Ok(Response::new(DelAppResponse { is_del_app }))
    }
}
