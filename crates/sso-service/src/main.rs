//! SSO Service
//!
//! Entry point for the multi-tenant SSO gRPC server.
//!
//! # Startup
//!
//! 1. Load configuration from the environment
//! 2. Initialize tracing (format selected by `SSO_ENV`)
//! 3. Optionally install the Prometheus scrape endpoint
//! 4. Connect the Postgres pool (with `statement_timeout`)
//! 5. Optionally apply migrations
//! 6. Serve `sso.Auth`, `sso.Permissions`, `sso.Apps` until SIGINT/SIGTERM
//! 7. Close the pool

use metrics_exporter_prometheus::PrometheusBuilder;
use secrecy::ExposeSecret;
use sso_service::config::{Config, Environment};
use sso_service::grpc::SsoServices;
use sso_service::repositories::PgStore;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pool acquire timeout.
const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(Environment::Prod);
            error!(error = %e, "Invalid SSO configuration");
            return Err(e.into());
        }
    };
    init_tracing(config.environment);

    info!(
        environment = config.environment.as_str(),
        "Starting SSO service"
    );

    info!(
        bind_address = %config.bind_address,
        token_ttl_seconds = config.token_ttl_seconds,
        bcrypt_cost = config.bcrypt_cost,
        request_timeout_seconds = config.request_timeout_seconds,
        "Configuration loaded successfully"
    );

    if let Some(metrics_addr) = config.metrics_bind_address {
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()
            .map_err(|e| {
                error!(error = %e, "Failed to install Prometheus metrics exporter");
                format!("Failed to install Prometheus metrics exporter: {e}")
            })?;
        info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    }

    // Pool connections carry a server-side statement_timeout
    info!("Opening Postgres pool");
    let db_url = add_query_timeout(
        config.database_url.expose_secret(),
        config.db_statement_timeout_seconds,
    );
    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(DB_ACQUIRE_TIMEOUT)
        .connect(&db_url)
        .await
        .map_err(|e| {
            error!(error = %e, "Postgres pool could not connect");
            e
        })?;

    info!("Postgres pool ready");

    if config.run_migrations {
        info!("Applying database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                error!("Failed to apply migrations: {}", e);
                e
            })?;
        info!("Database migrations applied");
    }

    let services = SsoServices::new(
        PgStore::new(db_pool.clone()),
        Duration::from_secs(config.token_ttl_seconds),
        config.bcrypt_cost,
    );

    info!("SSO service listening on {}", config.bind_address);

    let mut server = tonic::transport::Server::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds));
    services
        .add_to(&mut server)
        .serve_with_shutdown(config.bind_address, shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = %e, "gRPC server failed");
            e
        })?;

    db_pool.close().await;
    info!("SSO service shutdown complete");

    Ok(())
}

/// `local` logs human-readable text; `dev` and `prod` log JSON.
fn init_tracing(environment: Environment) {
    let default_filter = match environment {
        Environment::Prod => "sso_service=info",
        Environment::Local | Environment::Dev => "sso_service=debug,tower_http=info",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let (text, json) = match environment {
        Environment::Local => (Some(tracing_subscriber::fmt::layer()), None),
        Environment::Dev | Environment::Prod => {
            (None, Some(tracing_subscriber::fmt::layer().json()))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}

/// Resolves on the first SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!(signal = "SIGINT", "Draining in-flight requests"),
            Err(e) => error!(error = %e, "SIGINT handler unavailable"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!(signal = "SIGTERM", "Draining in-flight requests");
            }
            Err(e) => {
                error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Appends a Postgres `statement_timeout` option to the connection URL.
fn add_query_timeout(url: &str, timeout_secs: u32) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}options=-c%20statement_timeout%3D{}s",
        url, separator, timeout_secs
    )
}
