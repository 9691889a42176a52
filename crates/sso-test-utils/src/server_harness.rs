//! Test server harness for E2E testing
//!
//! Provides `TestSsoServer` for spawning real SSO gRPC servers in tests.

use proto_gen::sso::apps_client::AppsClient;
use proto_gen::sso::auth_client::AuthClient;
use proto_gen::sso::permissions_client::PermissionsClient;
use sso_service::grpc::SsoServices;
use sso_service::repositories::MemoryStore;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tonic::transport::{Channel, Server};

/// Token TTL used unless a test asks for another.
pub const TEST_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Lowest accepted bcrypt cost, to keep tests fast.
pub const TEST_BCRYPT_COST: u32 = 10;

/// Test harness for spawning the SSO server in E2E tests.
///
/// The server runs over a fresh [`MemoryStore`], so every test starts with
/// empty storage and ids beginning at 1.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_register_e2e() -> Result<(), anyhow::Error> {
///     let server = TestSsoServer::spawn().await?;
///     let mut auth = server.auth_client().await?;
///
///     let response = auth
///         .register(RegisterRequest {
///             email: "a@test.com".into(),
///             password: "password1".into(),
///         })
///         .await?;
///
///     assert_eq!(response.into_inner().user_id, 1);
///     Ok(())
/// }
/// ```
pub struct TestSsoServer {
    addr: SocketAddr,
    store: MemoryStore,
    shutdown: CancellationToken,
    _handle: JoinHandle<()>,
}

impl TestSsoServer {
    /// Spawn a new test server with the default token TTL.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_ttl(TEST_TOKEN_TTL).await
    }

    /// Spawn a new test server whose tokens live for `token_ttl`.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Serve all three SSO services in the background
    pub async fn spawn_with_ttl(token_ttl: Duration) -> Result<Self, anyhow::Error> {
        let store = MemoryStore::new();
        let services = SsoServices::new(store.clone(), token_ttl, TEST_BCRYPT_COST);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Convert tokio listener to tonic-compatible incoming stream
        let incoming = tokio_stream::wrappers::TcpListenerStream::new(listener);

        let shutdown = CancellationToken::new();
        let server_shutdown = shutdown.clone();

        let mut server = Server::builder();
        let router = services.add_to(&mut server);
        let handle = tokio::spawn(async move {
            let result = router
                .serve_with_incoming_shutdown(incoming, async move {
                    server_shutdown.cancelled().await;
                })
                .await;
            if let Err(e) = result {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            store,
            shutdown,
            _handle: handle,
        })
    }

    /// The storage backing the server, for seeding and inspection.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Connect an `sso.Auth` client.
    pub async fn auth_client(&self) -> Result<AuthClient<Channel>, anyhow::Error> {
        Ok(AuthClient::new(self.channel().await?))
    }

    /// Connect an `sso.Permissions` client.
    pub async fn permissions_client(&self) -> Result<PermissionsClient<Channel>, anyhow::Error> {
        Ok(PermissionsClient::new(self.channel().await?))
    }

    /// Connect an `sso.Apps` client.
    pub async fn apps_client(&self) -> Result<AppsClient<Channel>, anyhow::Error> {
        Ok(AppsClient::new(self.channel().await?))
    }

    async fn channel(&self) -> Result<Channel, anyhow::Error> {
        Channel::from_shared(self.url())?
            .connect()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to test server: {}", e))
    }
}

impl Drop for TestSsoServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
        self._handle.abort();
    }
}
