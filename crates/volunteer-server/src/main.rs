//! Volunteer Hub Server binary

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use volunteer_core::RecordStore;
use volunteer_server::config::ServerConfig;
use volunteer_server::services::{auth, AuthService};
use volunteer_server::{build_router, storage, AppState};

const DEFAULT_LOG_FILTER: &str = "volunteer_server=info,volunteer_core=info,tower_http=info";

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let config = ServerConfig::parse();

    info!(
        "Starting Volunteer Hub Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(config: ServerConfig) -> Result<()> {
    let addr = config.socket_addr()?;

    let backend = storage::open_backend(&config).await?;
    let store = Arc::new(RecordStore::new(backend));
    let upgraded = store
        .upgrade_legacy_records()
        .await
        .context("Failed to upgrade stored records")?;
    if upgraded > 0 {
        info!("Upgraded {} records from the legacy layout", upgraded);
    }

    let auth_service = Arc::new(build_auth_service(&config)?);
    info!("Admin user: {}", auth_service.admin_user());

    let state = AppState {
        store,
        auth_service,
    };

    info!("Static files directory: {}", config.static_dir.display());
    let app = build_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_auth_service(config: &ServerConfig) -> Result<AuthService> {
    let jwt_secret = config.jwt_secret.clone().unwrap_or_else(|| {
        warn!("JWT_SECRET not set, generated a random one; sessions end on restart");
        auth::random_secret(48)
    });

    if let Some(hash) = &config.admin_password_hash {
        return AuthService::from_hash(config.admin_user.clone(), hash.clone(), jwt_secret);
    }

    let password = match &config.admin_password {
        Some(password) => password.clone(),
        None => {
            let generated = auth::random_secret(16);
            warn!(
                "ADMIN_PASSWORD not set, generated admin password: {}",
                generated
            );
            generated
        }
    };

    AuthService::from_password(config.admin_user.clone(), &password, jwt_secret)
}
