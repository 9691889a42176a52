//! Integration tests for `sso.Auth`
//!
//! Register, login, identity lookup and the app-scoped admin query, driven
//! through a real gRPC server.

use proto_gen::sso::{GetUserIdRequest, IsAdminRequest, LoginRequest, RegisterRequest};
use sso_test_utils::*;
use tonic::Code;

fn login_request(email: &str, password: &str, app_name: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
        app_id: 0,
        app_name: app_name.to_string(),
    }
}

#[tokio::test]
async fn test_register_then_login_carries_uid() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;

    // Act
    let seeded = seed_app(&mut auth, &mut apps).await?;

    // Assert
    seeded
        .creator_token
        .assert_valid_jwt()
        .assert_for_user(seeded.creator_id)
        .assert_for_app(seeded.app_id)
        .assert_for_email(TEST_EMAIL)
        .assert_expires_in(TEST_TOKEN_TTL.as_secs());

    Ok(())
}

#[tokio::test]
async fn test_login_by_app_id() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    let token = auth
        .login(LoginRequest {
            email: TEST_EMAIL.into(),
            password: TEST_PASSWORD.into(),
            app_id: seeded.app_id,
            app_name: String::new(),
        })
        .await
        .assert_ok()
        .token;

    token.assert_for_app(seeded.app_id);
    Ok(())
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    seed_app(&mut auth, &mut apps).await?;

    let wrong_password = auth
        .login(login_request(TEST_EMAIL, "wrong-password", TEST_APP_NAME))
        .await
        .assert_code(Code::InvalidArgument);
    let unknown_email = auth
        .login(login_request("nobody@test.com", TEST_PASSWORD, TEST_APP_NAME))
        .await
        .assert_code(Code::InvalidArgument);
    let unknown_app = auth
        .login(login_request(TEST_EMAIL, TEST_PASSWORD, "no-such-app"))
        .await
        .assert_code(Code::InvalidArgument);

    assert_eq!(wrong_password.message(), unknown_email.message());
    assert_eq!(wrong_password.message(), unknown_app.message());
    Ok(())
}

#[tokio::test]
async fn test_register_duplicate_email() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;

    let first = register_user(&mut auth, TEST_EMAIL, TEST_PASSWORD).await?;
    auth.register(RegisterRequest {
        email: TEST_EMAIL.into(),
        password: TEST_PASSWORD.into(),
    })
    .await
    .assert_code(Code::AlreadyExists);

    let lookup = auth
        .get_user_id(GetUserIdRequest {
            email: TEST_EMAIL.into(),
        })
        .await
        .assert_ok();
    assert_eq!(lookup.user_id, first);
    Ok(())
}

#[tokio::test]
async fn test_register_validation_lists_every_field() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;

    let status = auth
        .register(RegisterRequest {
            email: "not-an-email".into(),
            password: String::new(),
        })
        .await
        .assert_code(Code::InvalidArgument);

    assert_eq!(
        status.message(),
        "field email is not a valid email, field password is a required field"
    );
    Ok(())
}

#[tokio::test]
async fn test_login_requires_exactly_one_app_reference() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;

    let both = auth
        .login(LoginRequest {
            email: TEST_EMAIL.into(),
            password: TEST_PASSWORD.into(),
            app_id: 1,
            app_name: TEST_APP_NAME.into(),
        })
        .await
        .assert_code(Code::InvalidArgument);
    assert!(both.message().contains("mutually exclusive"));

    let neither = auth
        .login(login_request(TEST_EMAIL, TEST_PASSWORD, ""))
        .await
        .assert_code(Code::InvalidArgument);
    assert!(neither.message().contains("app_id or app_name"));
    Ok(())
}

#[tokio::test]
async fn test_get_user_id_unknown_email() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;

    let status = auth
        .get_user_id(GetUserIdRequest {
            email: "nobody@test.com".into(),
        })
        .await
        .assert_code(Code::InvalidArgument);
    assert_eq!(status.message(), "invalid credentials");
    Ok(())
}

#[tokio::test]
async fn test_auth_is_admin_for_creator() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;
    let other_id = register_user(&mut auth, OTHER_EMAIL, OTHER_PASSWORD).await?;

    let creator = auth
        .is_admin(IsAdminRequest {
            user_id: seeded.creator_id,
            app_id: seeded.app_id,
            app_name: String::new(),
        })
        .await
        .assert_ok();
    assert!(creator.is_admin);

    let other = auth
        .is_admin(IsAdminRequest {
            user_id: other_id,
            app_id: 0,
            app_name: TEST_APP_NAME.into(),
        })
        .await
        .assert_ok();
    assert!(!other.is_admin);
    Ok(())
}

#[tokio::test]
async fn test_auth_is_admin_rejects_out_of_range_user_id() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;

    let status = auth
        .is_admin(IsAdminRequest {
            user_id: (i64::MAX as u64) + 1,
            app_id: 1,
            app_name: String::new(),
        })
        .await
        .assert_code(Code::InvalidArgument);
    assert!(status.message().contains("out of range"));
    Ok(())
}

#[tokio::test]
async fn test_zero_ttl_token_cannot_authorize() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn_with_ttl(std::time::Duration::ZERO).await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    apps.del_app(with_bearer(
        proto_gen::sso::DelAppRequest {
            app_name: TEST_APP_NAME.into(),
        },
        &seeded.creator_token,
    ))
    .await
    .assert_code(Code::InvalidArgument);

    assert_eq!(server.store().app_count(), 1);
    Ok(())
}
