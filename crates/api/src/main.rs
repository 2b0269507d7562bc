use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bedwatch_core::backend::Backend;
use bedwatch_core::hospital::HospitalWardRecord;
use bedwatch_core::memory::MemoryBackend;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bedwatch_api::background;
use bedwatch_api::config::{BackendKind, ServerConfig};
use bedwatch_api::router::build_app_router;
use bedwatch_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bedwatch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, backend = ?config.backend, "Loaded server configuration");

    // --- Backend ---
    let backend: Arc<dyn Backend> = match config.backend {
        BackendKind::Postgres => connect_postgres().await,
        BackendKind::Memory => load_memory(config.seed_file.as_deref()).await,
    };

    // --- Favorite cleanup ---
    let cleanup_cancel = tokio_util::sync::CancellationToken::new();
    let cleanup_handle = (config.favorite_cleanup_interval_secs > 0).then(|| {
        tokio::spawn(background::favorite_cleanup::run(
            Arc::clone(&backend),
            Duration::from_secs(config.favorite_cleanup_interval_secs),
            cleanup_cancel.clone(),
        ))
    });
    if cleanup_handle.is_none() {
        tracing::info!("Favorite cleanup disabled");
    }

    // --- App state ---
    let state = AppState {
        backend,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cleanup_cancel.cancel();
    if let Some(handle) = cleanup_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Favorite cleanup stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Connect, check and migrate the PostgreSQL backend.
async fn connect_postgres() -> Arc<dyn Backend> {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = bedwatch_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    bedwatch_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    bedwatch_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    Arc::new(bedwatch_db::PgBackend::new(pool))
}

/// Build the in-memory backend, seeded from a JSON array of records if given.
async fn load_memory(seed_file: Option<&str>) -> Arc<dyn Backend> {
    let backend = MemoryBackend::new();

    if let Some(path) = seed_file {
        let raw = tokio::fs::read_to_string(path)
            .await
            .unwrap_or_else(|e| panic!("Failed to read seed file '{path}': {e}"));
        let records: Vec<HospitalWardRecord> = serde_json::from_str(&raw)
            .unwrap_or_else(|e| panic!("Invalid seed file '{path}': {e}"));
        tracing::info!(count = records.len(), path, "Seeded in-memory backend");
        backend.replace_records(records).await;
    } else {
        tracing::warn!("In-memory backend started without records");
    }

    Arc::new(backend)
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
