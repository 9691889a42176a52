//! Integration tests for bearer-token handling on privileged calls
//!
//! Malformed `authorization` metadata is an authentication failure; a
//! well-formed token that fails verification is an invalid-credentials
//! failure.

use proto_gen::sso::DelAppRequest;
use sso_test_utils::*;
use tonic::Code;

fn del_app_request() -> DelAppRequest {
    DelAppRequest {
        app_name: TEST_APP_NAME.to_string(),
    }
}

#[tokio::test]
async fn test_missing_authorization_is_unauthenticated() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    seed_app(&mut auth, &mut apps).await?;

    apps.del_app(del_app_request())
        .await
        .assert_code(Code::Unauthenticated);
    assert_eq!(server.store().app_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_malformed_authorization_is_unauthenticated() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    let basic = format!("Basic {}", seeded.creator_token);
    let lowercase = format!("bearer {}", seeded.creator_token);
    for value in [basic.as_str(), lowercase.as_str(), "Bearer", "token-only"] {
        apps.del_app(with_authorization(del_app_request(), value))
            .await
            .assert_code(Code::Unauthenticated);
    }
    assert_eq!(server.store().app_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_forged_signature_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    let forged = TestTokenBuilder::new()
        .for_user(seeded.creator_id)
        .for_app(seeded.app_id)
        .sign("not-the-app-secret");

    apps.del_app(with_bearer(del_app_request(), &forged))
        .await
        .assert_code(Code::InvalidArgument);
    assert_eq!(server.store().app_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_expired_token_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    let expired = TestTokenBuilder::new()
        .for_user(seeded.creator_id)
        .for_app(seeded.app_id)
        .expires_in(-10)
        .sign(TEST_APP_SECRET);

    apps.del_app(with_bearer(del_app_request(), &expired))
        .await
        .assert_code(Code::InvalidArgument);
    Ok(())
}

#[tokio::test]
async fn test_token_for_other_app_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;
    // Same secret, different app: the app_id claim must still match.
    let app2_id = create_app(&mut apps, TEST_EMAIL, "app2", TEST_APP_SECRET).await?;

    let token_for_app2 = TestTokenBuilder::new()
        .for_user(seeded.creator_id)
        .for_app(app2_id)
        .sign(TEST_APP_SECRET);

    apps.del_app(with_bearer(del_app_request(), &token_for_app2))
        .await
        .assert_code(Code::InvalidArgument);
    assert_eq!(server.store().app_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_mistyped_uid_claim_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    for uid in [serde_json::json!("1"), serde_json::json!(-1), serde_json::json!(1.5)] {
        let token = TestTokenBuilder::new()
            .with_raw_uid(uid)
            .for_app(seeded.app_id)
            .sign(TEST_APP_SECRET);

        apps.del_app(with_bearer(del_app_request(), &token))
            .await
            .assert_code(Code::InvalidArgument);
    }
    assert_eq!(server.store().app_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_hand_signed_creator_token_is_accepted() -> Result<(), anyhow::Error> {
    let server = TestSsoServer::spawn().await?;
    let mut auth = server.auth_client().await?;
    let mut apps = server.apps_client().await?;
    let seeded = seed_app(&mut auth, &mut apps).await?;

    let token = TestTokenBuilder::new()
        .for_user(seeded.creator_id)
        .for_app(seeded.app_id)
        .sign(TEST_APP_SECRET);

    apps.del_app(with_bearer(del_app_request(), &token))
        .await
        .assert_ok();
    assert_eq!(server.store().app_count(), 0);
    Ok(())
}
