mod api;
mod middleware;
mod scheduler;
mod sink;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limiter, AppState},
    middleware::AuthState,
    sink::LogSink,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = geovis_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let deps = Arc::new(geovis_scan::ScanDeps::from_config(&config)?);
    tracing::info!(platforms = deps.adapters.len(), env = %config.env, "scan engine ready");

    let limiter = default_rate_limiter();
    let _scheduler = scheduler::build_scheduler(limiter.clone()).await?;

    let auth = AuthState::from_env(matches!(config.env, geovis_core::Environment::Development))?;
    let app = build_app(
        AppState {
            deps,
            sink: Arc::new(LogSink),
        },
        auth,
        limiter,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
