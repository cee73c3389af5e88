use axum::{extract::Request, ServiceExt};
use server_http::{build_router, with_normalized_paths, AppState};
use shared::config::Config;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tollgate::auth::{defaults::ensure_default_admin, AccountRepository, SledAccountRepository};
use tollgate::profiles::{ProfileRepository, SledProfileRepository};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env first so RUST_LOG from it is honoured
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    install_panic_hook();

    info!("Starting Tollgate HTTP Server...");

    match dotenv {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let (accounts, profiles) = init_storage(&config).await;
    let state = AppState::new(&config, accounts, profiles);

    // Forget clients whose rate-limit window has ended
    let rate_limiter = state.rate_limiter.clone();
    let purge_every = config.rate_limit.window.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(purge_every);
        loop {
            interval.tick().await;
            rate_limiter.purge_expired();
        }
    });

    let app = with_normalized_paths(build_router(state, &config));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("Failed to bind HTTP listener");

    info!("HTTP Server listening on http://{}", address);

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("HTTP server failed");

    info!("Server shutdown complete");
}

/// Any panic is logged and ends the process with exit code 1.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Uncaught panic, shutting down: {}", panic_info);
        std::process::exit(1);
    }));
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}

async fn init_storage(
    config: &Config,
) -> (Arc<dyn AccountRepository>, Arc<dyn ProfileRepository>) {
    let data_dir = Path::new(&config.data_dir);

    std::fs::create_dir_all(data_dir).expect("Failed to create data directory");

    let accounts: Arc<dyn AccountRepository> = Arc::new(
        SledAccountRepository::new(data_dir.join("accounts.sled"))
            .expect("Failed to initialize account repository"),
    );
    let profiles: Arc<dyn ProfileRepository> = Arc::new(
        SledProfileRepository::new(data_dir.join("profiles.sled"))
            .expect("Failed to initialize profile repository"),
    );

    if let Some(admin) = &config.admin {
        info!("Ensuring bootstrap admin account...");
        ensure_default_admin(accounts.as_ref(), &admin.email, &admin.password)
            .await
            .expect("Failed to create default admin account");
    }

    (accounts, profiles)
}
