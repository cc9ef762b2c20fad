//! HTTP server implementation using Axum.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::routing::{get, post};
use cadence_core::config::CadenceConfig;
use cadence_scheduler::TaskRegistry;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server.
pub struct AppState {
    pub registry: Arc<TaskRegistry>,
    /// Interval used when a submission leaves the field blank.
    pub default_interval_secs: u64,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(registry: Arc<TaskRegistry>, default_interval_secs: u64) -> Self {
        Self {
            registry,
            default_interval_secs,
            start_time: Instant::now(),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    build_router_from_arc(Arc::new(state))
}

pub fn build_router_from_arc(shared: Arc<AppState>) -> Router {
    // HTML console
    let console = Router::new()
        .route("/", get(super::routes::form).post(super::routes::submit))
        .route("/logs/{id}", get(super::routes::logs_page))
        .route("/stop/{id}", get(super::routes::stop_page));

    // JSON API
    let api = Router::new()
        .route("/health", get(super::routes::health_check))
        .route("/api/v1/tasks", get(super::routes::api_list_tasks))
        .route("/api/v1/tasks/{id}", get(super::routes::api_get_task))
        .route("/api/v1/tasks/{id}/stop", post(super::routes::api_stop_task))
        .layer(cors_layer());

    console
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

fn cors_layer() -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    // Example: CADENCE_CORS_ORIGINS=https://ops.example.com,https://admin.example.com
    if let Ok(origins_str) = std::env::var("CADENCE_CORS_ORIGINS") {
        let origins: Vec<_> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();
        cors.allow_origin(origins)
    } else {
        cors.allow_origin(Any)
    }
}

/// Serve until Ctrl-C, then stop every task and wait for the workers.
pub async fn start(config: &CadenceConfig, registry: Arc<TaskRegistry>) -> anyhow::Result<()> {
    let state = AppState::new(registry.clone(), config.scheduler.default_interval_secs);
    let app = build_router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("🛑 Shutting down, stopping {} task(s)", registry.len());
    registry.shutdown(config.scheduler.shutdown_grace()).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
