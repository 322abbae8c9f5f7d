//! Project Dashboard Server
//!
//! Serves the sign-in flow and timeline API from in-memory stores.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pd_api::{AppState, MemoryProjectStore};
use pd_auth::{MemoryIdentityProvider, MemorySessionStore, SessionStore};
use pd_core::clock::{Clock, SystemClock};
use pd_core::config::AppConfig;

mod health;
mod seed;

use health::{HealthChecker, HealthConfig};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        AppConfig::default()
    });

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        site_url = %config.server.site_url,
        "Starting {}",
        config.instance.app_title
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sessions = Arc::new(MemorySessionStore::new(clock.clone()));
    let identity = Arc::new(
        MemoryIdentityProvider::new(clock.clone())
            .with_code_lifetime(config.auth.magic_link_lifetime_seconds),
    );
    let projects = Arc::new(MemoryProjectStore::new());

    let dev_users = std::env::var("DEV_USERS").unwrap_or_else(|_| seed::DEFAULT_DEV_USERS.to_string());
    seed::seed_users(&identity, &seed::parse_dev_users(&dev_users)?);
    seed::seed_demo_project(projects.as_ref(), clock.today()).await?;

    let health = Arc::new(HealthChecker::new(
        HealthConfig::default(),
        projects.clone(),
        clock.clone(),
    ));

    spawn_session_sweeper(sessions.clone());

    let addr = config.server_addr();
    let state = AppState::new(config, clock, sessions, identity, projects);
    let app = build_router(state, health);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,pd_server=debug,pd_api=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Build the application router
fn build_router(state: AppState, health: Arc<HealthChecker>) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    // Probes, no session required
    let health_routes = Router::new()
        .route("/health", get(health::liveness))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    Router::new()
        .merge(health_routes)
        .merge(pd_api::router().with_state(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// Periodically drop expired sessions from the in-memory store
fn spawn_session_sweeper(sessions: Arc<MemorySessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match sessions.cleanup_expired() {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Swept expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Session sweep failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
