//! Integration tests for `sso.Permissions`
//!
//! Admin grants are creator-gated; role queries are public.

use proto_gen::sso::{DelAdminRequest, IsAdminRequest, IsCreatorRequest, SetAdminRequest};
use sso_test_utils::*;
use tonic::Code;

fn set_admin_request(email: &str) -> SetAdminRequest {
    SetAdminRequest {
        email: email.to_string(),
        app_id: 0,
        app_name: TEST_APP_NAME.to_string(),
    }
}

fn del_admin_request(email: &str) -> DelAdminRequest {
    DelAdminRequest {
        email: email.to_string(),
        app_id: 0,
        app_name: TEST_APP_NAME.to_string(),
    }
}

fn is_admin_request(user_id: u64, app_id: i64) -> IsAdminRequest {
    IsAdminRequest {
        user_id,
        app_id,
        app_name: String::new(),
    }
}

#[tokio::test]
async fn test_set_then_del_admin() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let mut permissions = server.permissions_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;
    let other_id = register_user(&mut auth, OTHER_EMAIL, OTHER_PASSWORD).await?;

    // Act / Assert: grant
    let granted = permissions
        .set_admin(with_bearer(
            set_admin_request(OTHER_EMAIL),
            &seeded.creator_token,
        ))
        .await
        .assert_ok();
    assert!(granted.set_admin);
    assert!(
        permissions
            .is_admin(is_admin_request(other_id, seeded.app_id))
            .await
            .assert_ok()
            .is_admin
    );

    // Act / Assert: revoke
    let revoked = permissions
        .del_admin(with_bearer(
            del_admin_request(OTHER_EMAIL),
            &seeded.creator_token,
        ))
        .await
        .assert_ok();
    assert!(revoked.del_admin);
    assert!(
        !permissions
            .is_admin(is_admin_request(other_id, seeded.app_id))
            .await
            .assert_ok()
            .is_admin
    );

    Ok(())
}

#[tokio::test]
async fn test_set_and_del_admin_are_idempotent() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let mut permissions = server.permissions_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;
    register_user(&mut auth, OTHER_EMAIL, OTHER_PASSWORD).await?;

    for _ in 0..2 {
        permissions
            .set_admin(with_bearer(
                set_admin_request(OTHER_EMAIL),
                &seeded.creator_token,
            ))
            .await
            .assert_ok();
    }
    assert_eq!(server.store().admin_count(seeded.app_id), 2);

    for _ in 0..2 {
        permissions
            .del_admin(with_bearer(
                del_admin_request(OTHER_EMAIL),
                &seeded.creator_token,
            ))
            .await
            .assert_ok();
    }
    assert_eq!(server.store().admin_count(seeded.app_id), 1);

    Ok(())
}

#[tokio::test]
async fn test_non_creator_cannot_grant_admin() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let mut permissions = server.permissions_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;
    register_user(&mut auth, OTHER_EMAIL, OTHER_PASSWORD).await?;
    let other_token = login(&mut auth, OTHER_EMAIL, OTHER_PASSWORD, TEST_APP_NAME).await?;

    let status = permissions
        .set_admin(with_bearer(set_admin_request(OTHER_EMAIL), &other_token))
        .await
        .assert_code(Code::PermissionDenied);
    assert_eq!(status.message(), "you are not the app creator");

    permissions
        .del_admin(with_bearer(del_admin_request(TEST_EMAIL), &other_token))
        .await
        .assert_code(Code::PermissionDenied);

    // Creator still holds admin.
    assert!(
        permissions
            .is_admin(is_admin_request(seeded.creator_id, seeded.app_id))
            .await
            .assert_ok()
            .is_admin
    );
    Ok(())
}

#[tokio::test]
async fn test_set_admin_without_bearer_is_unauthenticated() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let mut permissions = server.permissions_client().await?;
    seed_app(&mut auth, &mut apps).await?;

    // An unregistered target must not be disclosed to an unauthenticated caller.
    permissions
        .set_admin(set_admin_request("nobody@test.com"))
        .await
        .assert_code(Code::Unauthenticated);
    Ok(())
}

#[tokio::test]
async fn test_set_admin_unknown_target_for_creator() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let mut permissions = server.permissions_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    permissions
        .set_admin(with_bearer(
            set_admin_request("nobody@test.com"),
            &seeded.creator_token,
        ))
        .await
        .assert_code(Code::InvalidArgument);
    Ok(())
}

#[tokio::test]
async fn test_is_creator() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let mut permissions = server.permissions_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;
    let other_id = register_user(&mut auth, OTHER_EMAIL, OTHER_PASSWORD).await?;

    let creator = permissions
        .is_creator(IsCreatorRequest {
            user_id: seeded.creator_id,
            app_id: seeded.app_id,
            app_name: String::new(),
        })
        .await
        .assert_ok();
    assert!(creator.is_creator);

    let other = permissions
        .is_creator(IsCreatorRequest {
            user_id: other_id,
            app_id: 0,
            app_name: TEST_APP_NAME.into(),
        })
        .await
        .assert_ok();
    assert!(!other.is_creator);

    let unknown_app = permissions
        .is_creator(IsCreatorRequest {
            user_id: seeded.creator_id,
            app_id: 99,
            app_name: String::new(),
        })
        .await
        .assert_ok();
    assert!(!unknown_app.is_creator);

    let unknown_user = permissions
        .is_admin(is_admin_request(99, seeded.app_id))
        .await
        .assert_ok();
    assert!(!unknown_user.is_admin);
    Ok(())
}

#[tokio::test]
async fn test_role_query_requires_user_id() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut permissions = server.permissions_client().await?;

    let status = permissions
        .is_admin(is_admin_request(0, 0))
        .await
        .assert_code(Code::InvalidArgument);
    assert_eq!(
        status.message(),
        "field user_id is a required field, field app_id or app_name is a required field"
    );
    Ok(())
}
