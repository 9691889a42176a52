// Message definitions for the `sso` package.
//
// Field tags are part of the wire contract: never renumber, only append.
// Requests carrying passwords, app secrets or tokens skip the derived Debug
// impl and redact those fields instead.

use std::fmt;

// ============================================================================
// Auth
// ============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
#[prost(skip_debug)]
pub struct LoginRequest {
    #[prost(string, tag = "1")]
    pub email: String,
    #[prost(string, tag = "2")]
    pub password: String,
    /// Target application by id. Mutually exclusive with `app_name`.
    #[prost(int64, tag = "3")]
    pub app_id: i64,
    /// Target application by name. Mutually exclusive with `app_id`.
    #[prost(string, tag = "4")]
    pub app_name: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("app_id", &self.app_id)
            .field("app_name", &self.app_name)
            .finish()
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
#[prost(skip_debug)]
pub struct LoginResponse {
    #[prost(string, tag = "1")]
    pub token: String,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
#[prost(skip_debug)]
pub struct RegisterRequest {
    #[prost(string, tag = "1")]
    pub email: String,
    #[prost(string, tag = "2")]
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterResponse {
    #[prost(uint64, tag = "1")]
    pub user_id: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUserIdRequest {
    #[prost(string, tag = "1")]
    pub email: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUserIdResponse {
    #[prost(uint64, tag = "1")]
    pub user_id: u64,
}

/// Shared by `Auth.IsAdmin` and `Permissions.IsAdmin`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IsAdminRequest {
    #[prost(uint64, tag = "1")]
    pub user_id: u64,
    #[prost(int64, tag = "2")]
    pub app_id: i64,
    #[prost(string, tag = "3")]
    pub app_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IsAdminResponse {
    #[prost(bool, tag = "1")]
    pub is_admin: bool,
}

// ============================================================================
// Permissions
// ============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetAdminRequest {
    /// Email of the user being granted admin rights.
    #[prost(string, tag = "1")]
    pub email: String,
    #[prost(int64, tag = "2")]
    pub app_id: i64,
    #[prost(string, tag = "3")]
    pub app_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetAdminResponse {
    #[prost(bool, tag = "1")]
    pub set_admin: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DelAdminRequest {
    /// Email of the user losing admin rights.
    #[prost(string, tag = "1")]
    pub email: String,
    #[prost(int64, tag = "2")]
    pub app_id: i64,
    #[prost(string, tag = "3")]
    pub app_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DelAdminResponse {
    #[prost(bool, tag = "1")]
    pub del_admin: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IsCreatorRequest {
    #[prost(uint64, tag = "1")]
    pub user_id: u64,
    #[prost(int64, tag = "2")]
    pub app_id: i64,
    #[prost(string, tag = "3")]
    pub app_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IsCreatorResponse {
    #[prost(bool, tag = "1")]
    pub is_creator: bool,
}

// ============================================================================
// Apps
// ============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAppIdRequest {
    #[prost(string, tag = "1")]
    pub app_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAppIdResponse {
    #[prost(int64, tag = "1")]
    pub app_id: i64,
    #[prost(string, tag = "2")]
    pub app_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
#[prost(skip_debug)]
pub struct SetAppRequest {
    /// Email of the user who becomes the app's creator.
    #[prost(string, tag = "1")]
    pub email: String,
    #[prost(string, tag = "2")]
    pub app_name: String,
    #[prost(string, tag = "3")]
    pub app_secret: String,
}

impl fmt::Debug for SetAppRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetAppRequest")
            .field("email", &self.email)
            .field("app_name", &self.app_name)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetAppResponse {
    #[prost(int64, tag = "1")]
    pub app_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
#[prost(skip_debug)]
pub struct UpdAppRequest {
    #[prost(string, tag = "1")]
    pub app_name: String,
    #[prost(string, tag = "2")]
    pub new_app_name: String,
    #[prost(string, tag = "3")]
    pub new_app_secret: String,
}

impl fmt::Debug for UpdAppRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdAppRequest")
            .field("app_name", &self.app_name)
            .field("new_app_name", &self.new_app_name)
            .field("new_app_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdAppResponse {
    #[prost(bool, tag = "1")]
    pub is_upd_app: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DelAppRequest {
    #[prost(string, tag = "1")]
    pub app_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DelAppResponse {
    #[prost(bool, tag = "1")]
    pub is_del_app: bool,
}
