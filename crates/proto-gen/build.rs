// Build script generating the tonic service stubs for the SSO API.
//
// Message types are declared by hand in `src/sso/messages.rs` (prost derives), so the
// services are described with tonic-build's manual builder and no `protoc`
// is required at build time.

use tonic_build::manual::{Builder, Method, Service};

const PACKAGE: &str = "sso";
const CODEC: &str = "tonic::codec::ProstCodec";

fn unary(name: &str, route: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::sso::{}", input))
        .output_type(format!("crate::sso::{}", output))
        .codec_path(CODEC)
        .build()
}

fn main() {
    let auth = Service::builder()
        .name("Auth")
        .package(PACKAGE)
        .method(unary("login", "Login", "LoginRequest", "LoginResponse"))
        .method(unary(
            "register",
            "Register",
            "RegisterRequest",
            "RegisterResponse",
        ))
        .method(unary(
            "get_user_id",
            "GetUserId",
            "GetUserIdRequest",
            "GetUserIdResponse",
        ))
        .method(unary(
            "is_admin",
            "IsAdmin",
            "IsAdminRequest",
            "IsAdminResponse",
        ))
        .build();

    let permissions = Service::builder()
        .name("Permissions")
        .package(PACKAGE)
        .method(unary(
            "set_admin",
            "SetAdmin",
            "SetAdminRequest",
            "SetAdminResponse",
        ))
        .method(unary(
            "del_admin",
            "DelAdmin",
            "DelAdminRequest",
            "DelAdminResponse",
        ))
        .method(unary(
            "is_admin",
            "IsAdmin",
            "IsAdminRequest",
            "IsAdminResponse",
        ))
        .method(unary(
            "is_creator",
            "IsCreator",
            "IsCreatorRequest",
            "IsCreatorResponse",
        ))
        .build();

    let apps = Service::builder()
        .name("Apps")
        .package(PACKAGE)
        .method(unary(
            "get_app_id",
            "GetAppId",
            "GetAppIdRequest",
            "GetAppIdResponse",
        ))
        .method(unary("set_app", "SetApp", "SetAppRequest", "SetAppResponse"))
        .method(unary("upd_app", "UpdApp", "UpdAppRequest", "UpdAppResponse"))
        .method(unary("del_app", "DelApp", "DelAppRequest", "DelAppResponse"))
        .build();

    Builder::new().compile(&[auth, permissions, apps]);

    println!("cargo:rerun-if-changed=build.rs");
}
