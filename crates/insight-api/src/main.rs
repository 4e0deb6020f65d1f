use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use insight_api::{parse_allowed_origins, router, AppState, ServerConfig, StoreBackend};
use insight_db::{Database, PoolConfig};
use insight_inference::ConfiguredExtractors;
use insight_jobs::{JobWorker, QueryService, SubmissionGate, WorkerConfig};

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables daily-rotated file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter
fn init_tracing() -> Option<WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "insight_api=debug,insight_jobs=debug,insight_inference=info,tower_http=info".into()
    });
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = match log_file.as_deref() {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path.parent().unwrap_or(std::path::Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or("insight-api.log");
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name));

            if log_format == "json" {
                registry
                    .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                    .init();
            } else {
                registry
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(writer)
                            .with_ansi(log_ansi.unwrap_or(false)),
                    )
                    .init();
            }
            Some(guard)
        }
        None => {
            if log_format == "json" {
                registry.with(tracing_subscriber::fmt::layer().json()).init();
            } else {
                let mut layer = tracing_subscriber::fmt::layer();
                if let Some(ansi) = log_ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).init();
            }
            None
        }
    };

    info!(
        subsystem = "api",
        component = "main",
        op = "init_tracing",
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );
    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(
        subsystem = "api",
        component = "main",
        op = "shutdown",
        "Shutdown signal received"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let config = ServerConfig::from_env()?;

    let db = match config.store {
        StoreBackend::Memory => {
            info!(
                subsystem = "api",
                component = "main",
                op = "connect",
                "Using in-memory store"
            );
            Database::in_memory()
        }
        StoreBackend::Postgres => {
            let db =
                Database::connect_with_config(&config.database_url, PoolConfig::from_env()).await?;
            db.migrate().await?;
            db
        }
    };

    let extractors = Arc::new(ConfiguredExtractors::from_env()?);
    info!(
        subsystem = "api",
        component = "main",
        op = "configure",
        provider = extractors.config().provider.as_str(),
        "Extraction provider configured"
    );

    let (worker, queue) = JobWorker::new(db.clone(), extractors, WorkerConfig::from_env());
    queue.requeue_pending(&db).await?;
    let worker_handle = worker.start();

    let state = AppState::new(SubmissionGate::new(db.clone(), queue), QueryService::new(db));
    let origins = config
        .cors_origins
        .as_deref()
        .map(parse_allowed_origins)
        .unwrap_or_default();
    let app = router(state, origins);

    let addr: SocketAddr = config.bind_addr().parse()?;
    info!(
        subsystem = "api",
        component = "main",
        op = "serve",
        %addr,
        "Starting server"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The worker may already be draining if every queue sender is gone.
    if let Err(e) = worker_handle.shutdown().await {
        tracing::debug!(error = %e, "Job worker already stopping");
    }
    worker_handle.join().await?;
    info!(
        subsystem = "api",
        component = "main",
        op = "shutdown",
        "Server stopped"
    );
    Ok(())
}
