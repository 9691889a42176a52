//! Integration tests for `sso.Apps`
//!
//! App lifecycle, creator-only mutation, and the end-to-end scenario from
//! registration through cascading deletion.

use proto_gen::sso::{
    DelAppRequest, GetAppIdRequest, IsAdminRequest, IsCreatorRequest, SetAppRequest,
    UpdAppRequest,
};
use sso_test_utils::*;
use tonic::Code;

fn upd_app_request(app_name: &str, new_app_name: &str, new_app_secret: &str) -> UpdAppRequest {
    UpdAppRequest {
        app_name: app_name.to_string(),
        new_app_name: new_app_name.to_string(),
        new_app_secret: new_app_secret.to_string(),
    }
}

fn del_app_request(app_name: &str) -> DelAppRequest {
    DelAppRequest {
        app_name: app_name.to_string(),
    }
}

#[tokio::test]
async fn test_full_lifecycle_scenario() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let mut permissions = server.permissions_client().await?;

    // register("a@test.com","password1") -> uid 1
    let uid = register_user(&mut auth, TEST_EMAIL, TEST_PASSWORD).await?;
    assert_eq!(uid, 1);

    // setApp -> appId 1; creator is also admin
    let app_id = create_app(&mut apps, TEST_EMAIL, TEST_APP_NAME, TEST_APP_SECRET).await?;
    assert_eq!(app_id, 1);

    // login -> token decoding to {uid:1, app_id:1}
    let token = login(&mut auth, TEST_EMAIL, TEST_PASSWORD, TEST_APP_NAME).await?;
    token.assert_valid_jwt().assert_for_user(1).assert_for_app(1);

    let is_creator = permissions
        .is_creator(IsCreatorRequest {
            user_id: 1,
            app_id: 1,
            app_name: String::new(),
        })
        .await
        .assert_ok();
    assert!(is_creator.is_creator);

    let is_admin = permissions
        .is_admin(IsAdminRequest {
            user_id: 1,
            app_id: 1,
            app_name: String::new(),
        })
        .await
        .assert_ok();
    assert!(is_admin.is_admin);

    // delApp authorized by uid 1
    let deleted = apps
        .del_app(with_bearer(del_app_request(TEST_APP_NAME), &token))
        .await
        .assert_ok();
    assert!(deleted.is_del_app);

    // Relations cascaded away with the app.
    assert_eq!(server.store().app_count(), 0);
    assert_eq!(server.store().admin_count(1), 0);
    assert_eq!(server.store().creator_count(1), 0);
    // isAdmin(1, 1) -> false
    let is_admin = permissions
        .is_admin(IsAdminRequest {
            user_id: 1,
            app_id: 1,
            app_name: String::new(),
        })
        .await
        .assert_ok();
    assert!(!is_admin.is_admin);

    Ok(())
}

#[tokio::test]
async fn test_get_app_id() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    let found = apps
        .get_app_id(GetAppIdRequest {
            app_name: TEST_APP_NAME.into(),
        })
        .await
        .assert_ok();
    assert_eq!(found.app_id, seeded.app_id);
    assert_eq!(found.app_name, TEST_APP_NAME);

    apps.get_app_id(GetAppIdRequest {
        app_name: String::new(),
    })
    .await
    .assert_code(Code::InvalidArgument);
    Ok(())
}

#[tokio::test]
async fn test_set_app_duplicate_name() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    seed_app(&mut auth, &mut apps).await?;

    apps.set_app(SetAppRequest {
        email: TEST_EMAIL.into(),
        app_name: TEST_APP_NAME.into(),
        app_secret: "another-secret".into(),
    })
    .await
    .assert_code(Code::AlreadyExists);

    assert_eq!(server.store().app_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_set_app_unknown_creator() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut apps = server.apps_client().await?;

    apps.set_app(SetAppRequest {
        email: "nobody@test.com".into(),
        app_name: TEST_APP_NAME.into(),
        app_secret: TEST_APP_SECRET.into(),
    })
    .await
    .assert_code(Code::InvalidArgument);

    assert_eq!(server.store().app_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_upd_app_renames_and_rotates_secret() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    let updated = apps
        .upd_app(with_bearer(
            upd_app_request(TEST_APP_NAME, "app1-renamed", "secret2"),
            &seeded.creator_token,
        ))
        .await
        .assert_ok();
    assert!(updated.is_upd_app);

    let found = apps
        .get_app_id(GetAppIdRequest {
            app_name: "app1-renamed".into(),
        })
        .await
        .assert_ok();
    assert_eq!(found.app_id, seeded.app_id);

    // Tokens signed with the old secret no longer authorize anything.
    apps.del_app(with_bearer(
        del_app_request("app1-renamed"),
        &seeded.creator_token,
    ))
    .await
    .assert_code(Code::InvalidArgument);

    // A fresh login picks up the new secret.
    let fresh = login(&mut auth, TEST_EMAIL, TEST_PASSWORD, "app1-renamed").await?;
    apps.del_app(with_bearer(del_app_request("app1-renamed"), &fresh))
        .await
        .assert_ok();
    Ok(())
}

#[tokio::test]
async fn test_only_creator_may_update_or_delete() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    seed_app(&mut auth, &mut apps).await?;
    register_user(&mut auth, OTHER_EMAIL, OTHER_PASSWORD).await?;
    let other_token = login(&mut auth, OTHER_EMAIL, OTHER_PASSWORD, TEST_APP_NAME).await?;

    apps.upd_app(with_bearer(
        upd_app_request(TEST_APP_NAME, "stolen", "stolen-secret"),
        &other_token,
    ))
    .await
    .assert_code(Code::PermissionDenied);

    apps.del_app(with_bearer(del_app_request(TEST_APP_NAME), &other_token))
        .await
        .assert_code(Code::PermissionDenied);

    assert_eq!(server.store().app_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_upd_app_name_collision() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;
    create_app(&mut apps, TEST_EMAIL, "app2", "secret2").await?;

    apps.upd_app(with_bearer(
        upd_app_request(TEST_APP_NAME, "app2", "secret3"),
        &seeded.creator_token,
    ))
    .await
    .assert_code(Code::AlreadyExists);
    Ok(())
}

#[tokio::test]
async fn test_upd_app_validation_lists_every_field() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut apps = server.apps_client().await?;

    let status = apps
        .upd_app(upd_app_request("", "", ""))
        .await
        .assert_code(Code::InvalidArgument);
    assert_eq!(
        status.message(),
        "field app_name is a required field, field new_app_name is a required field, \
         field new_app_secret is a required field"
    );
    Ok(())
}
