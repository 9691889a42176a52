//! Storage outage tests
//!
//! The in-memory store can be switched to fail every call, standing in for a
//! lost database connection.

use proto_gen::sso::{
    DelAppRequest, GetUserIdRequest, IsAdminRequest, LoginRequest, RegisterRequest,
};
use sso_test_utils::*;
use tonic::Code;

#[tokio::test]
async fn test_storage_outage_is_internal_and_opaque() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let mut permissions = server.permissions_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    server.store().set_unavailable(true);

    let statuses = vec![
        auth.login(LoginRequest {
            email: TEST_EMAIL.into(),
            password: TEST_PASSWORD.into(),
            app_id: seeded.app_id,
            app_name: String::new(),
        })
        .await
        .assert_code(Code::Internal),
        auth.register(RegisterRequest {
            email: OTHER_EMAIL.into(),
            password: OTHER_PASSWORD.into(),
        })
        .await
        .assert_code(Code::Internal),
        auth.get_user_id(GetUserIdRequest {
            email: TEST_EMAIL.into(),
        })
        .await
        .assert_code(Code::Internal),
        permissions
            .is_admin(IsAdminRequest {
                user_id: seeded.creator_id,
                app_id: seeded.app_id,
                app_name: String::new(),
            })
            .await
            .assert_code(Code::Internal),
        apps.del_app(with_bearer(
            DelAppRequest {
                app_name: TEST_APP_NAME.into(),
            },
            &seeded.creator_token,
        ))
        .await
        .assert_code(Code::Internal),
    ];

    for status in statuses {
        assert_eq!(status.message(), "internal error");
    }
    Ok(())
}

#[tokio::test]
async fn test_service_recovers_after_outage() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    seed_app(&mut auth, &mut apps).await?;

    server.store().set_unavailable(true);
    auth.get_user_id(GetUserIdRequest {
        email: TEST_EMAIL.into(),
    })
    .await
    .assert_code(Code::Internal);

    server.store().set_unavailable(false);
    let found = auth
        .get_user_id(GetUserIdRequest {
            email: TEST_EMAIL.into(),
        })
        .await
        .assert_ok();
    assert_eq!(found.user_id, 1);
    Ok(())
}
