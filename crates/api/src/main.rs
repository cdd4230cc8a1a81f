use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use contrack_api::config::{LogFormat, ServerConfig};
use contrack_api::router::build_app_router;
use contrack_api::state::AppState;
use contrack_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "contrack_api=debug,contrack_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();
    init_tracing(config.log_format);
    tracing::info!(
        host = %config.host,
        port = config.port,
        cookie_secure = config.cookie_secure,
        "Loaded server configuration",
    );

    let pool = prepare_database(&config).await;

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "Contrack API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Shutdown complete");
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Connect, verify and migrate. Any failure aborts startup.
async fn prepare_database(config: &ServerConfig) -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = contrack_db::create_pool(&database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    contrack_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    contrack_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(max_connections = config.db_max_connections, "Database ready");
    pool
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, draining connections"),
        () = terminate => tracing::info!("Received SIGTERM, draining connections"),
    }
}
