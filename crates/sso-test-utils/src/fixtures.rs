//! Fixed test identities and seeding helpers.
//!
//! Helpers drive the server through its public RPCs so seeded state goes
//! through the same validation and hashing as production traffic.

use proto_gen::sso::apps_client::AppsClient;
use proto_gen::sso::auth_client::AuthClient;
use proto_gen::sso::{LoginRequest, RegisterRequest, SetAppRequest};
use tonic::metadata::MetadataValue;
use tonic::transport::Channel;
use tonic::Request;

/// Creator of the default test app.
pub const TEST_EMAIL: &str = "a@test.com";
pub const TEST_PASSWORD: &str = "password1";

/// A second, unprivileged user.
pub const OTHER_EMAIL: &str = "b@test.com";
pub const OTHER_PASSWORD: &str = "password2";

pub const TEST_APP_NAME: &str = "app1";
pub const TEST_APP_SECRET: &str = "secret1";

/// Register a user and return its id.
pub async fn register_user(
    auth: &mut AuthClient<Channel>,
    email: &str,
    password: &str,
) -> Result<u64, anyhow::Error> {
    let response = auth
        .register(RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;
    Ok(response.into_inner().user_id)
}

/// Create an app owned by the user registered under `email`.
pub async fn create_app(
    apps: &mut AppsClient<Channel>,
    email: &str,
    app_name: &str,
    app_secret: &str,
) -> Result<i64, anyhow::Error> {
    let response = apps
        .set_app(SetAppRequest {
            email: email.to_string(),
            app_name: app_name.to_string(),
            app_secret: app_secret.to_string(),
        })
        .await?;
    Ok(response.into_inner().app_id)
}

/// Log in to `app_name` and return the session token.
pub async fn login(
    auth: &mut AuthClient<Channel>,
    email: &str,
    password: &str,
    app_name: &str,
) -> Result<String, anyhow::Error> {
    let response = auth
        .login(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            app_id: 0,
            app_name: app_name.to_string(),
        })
        .await?;
    Ok(response.into_inner().token)
}

/// The standard setup: `TEST_EMAIL` registered, `TEST_APP_NAME` created by
/// that user, and a creator token for it.
pub struct SeededApp {
    pub creator_id: u64,
    pub app_id: i64,
    pub creator_token: String,
}

/// Seed [`SeededApp`] through the given clients.
pub async fn seed_app(
    auth: &mut AuthClient<Channel>,
    apps: &mut AppsClient<Channel>,
) -> Result<SeededApp, anyhow::Error> {
    let creator_id = register_user(auth, TEST_EMAIL, TEST_PASSWORD).await?;
    let app_id = create_app(apps, TEST_EMAIL, TEST_APP_NAME, TEST_APP_SECRET).await?;
    let creator_token = login(auth, TEST_EMAIL, TEST_PASSWORD, TEST_APP_NAME).await?;
    Ok(SeededApp {
        creator_id,
        app_id,
        creator_token,
    })
}

/// Wrap `message` in a request carrying `authorization: Bearer <token>`.
pub fn with_bearer<T>(message: T, token: &str) -> Request<T> {
    let mut request = Request::new(message);
    let value = MetadataValue::try_from(format!("Bearer {}", token))
        .expect("token must be valid ASCII metadata");
    request.metadata_mut().insert("authorization", value);
    request
}

/// Wrap `message` in a request carrying a raw `authorization` value.
pub fn with_authorization<T>(message: T, value: &str) -> Request<T> {
    let mut request = Request::new(message);
    let value = MetadataValue::try_from(value).expect("value must be valid ASCII metadata");
    request.metadata_mut().insert("authorization", value);
    request
}
