use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod models;
mod password;
mod repositories;
mod routes;
mod service;
mod validation;

#[cfg(test)]
mod testing;

use common::database::{ConnectionPool, DatabaseConfig};

use crate::{
    config::ServerConfig,
    password::{HashingConfig, PasswordService},
    repositories::UserRepository,
    service::CredentialService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: ConnectionPool,
    pub credentials: CredentialService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting authentication service");

    let server_config = ServerConfig::from_env()?;
    let addr = server_config.bind_address()?;

    // Initialize database connection pool; a failed probe is fatal
    let db_config = DatabaseConfig::from_env()?;
    let pool = ConnectionPool::init(&db_config)
        .await
        .context("Failed to connect to database")?;

    info!("Database connection successful");

    let user_repository = UserRepository::new(pool.clone());
    if server_config.init_schema {
        user_repository.ensure_schema().await?;
    }

    let hashing_config = HashingConfig::from_env()?;
    let password_service = PasswordService::new(&hashing_config)?;

    let app_state = AppState {
        db_pool: pool.clone(),
        credentials: CredentialService::new(user_repository, password_service),
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(addr).await?;
    info!("Authentication service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Authentication service stopped");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
