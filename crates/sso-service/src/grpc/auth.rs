//! `sso.Auth` handlers.

use super::validation::RequestValidator;
use super::wire_user_id;
use crate::services::AuthService;
use proto_gen::sso::{
    auth_server::Auth, GetUserIdRequest, GetUserIdResponse, IsAdminRequest, IsAdminResponse,
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};
use tonic::{Request, Response, Status};
use tracing::instrument;

/// gRPC adapter over [`AuthService`].
#[derive(Clone)]
pub struct AuthGrpc {
    service: AuthService,
}

impl AuthGrpc {
    pub fn new(service: AuthService) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl Auth for AuthGrpc {
    #[instrument(skip_all, name = "sso.grpc.login")]
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();

        let mut v = RequestValidator::new();
        v.email("email", &req.email).required("password", &req.password);
        let app = v.app_ref(req.app_id, &req.app_name);
        let app = v.finish_with(app)?;

        let token = self.service.login(&req.email, &req.password, &app).await?;
        Ok(Response::new(LoginResponse { token }))
    }

    #[instrument(skip_all, name = "sso.grpc.register")]
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let req = request.into_inner();

        RequestValidator::new()
            .email("email", &req.email)
            .required("password", &req.password)
            .finish()?;

        let user_id = self.service.register(&req.email, &req.password).await?;
        Ok(Response::new(RegisterResponse {
            user_id: wire_user_id(user_id)?,
        }))
    }

    #[instrument(skip_all, name = "sso.grpc.get_user_id")]
    async fn get_user_id(
        &self,
        request: Request<GetUserIdRequest>,
    ) -> Result<Response<GetUserIdResponse>, Status> {
        let req = request.into_inner();

        RequestValidator::new().email("email", &req.email).finish()?;

        let user_id = self.service.get_user_id(&req.email).await?;
        Ok(Response::new(GetUserIdResponse {
            user_id: wire_user_id(user_id)?,
        }))
    }

    #[instrument(skip_all, name = "sso.grpc.auth_is_admin")]
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
}
