//! Farmstead API server.
//!
//! Loads configuration, connects to Postgres, and serves the HTTP API until
//! Ctrl-C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use farmstead_api::{AppState, create_router};
use farmstead_db::connect;
use farmstead_shared::{AppConfig, JwtConfig, JwtService, config::LogFormat};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "farmstead=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut signal) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            signal.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(config.log.format);

    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("failed to connect to database")?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    tokio::fs::create_dir_all(&config.storage.upload_dir)
        .await
        .with_context(|| format!("failed to create {}", config.storage.upload_dir))?;
    info!(
        upload_dir = %config.storage.upload_dir,
        max_upload_bytes = config.storage.max_upload_bytes,
        "Upload storage ready"
    );

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage: Arc::new(config.storage.clone()),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
