//! Route handlers for the console and the JSON API.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::response::{Html, IntoResponse, Response};

use super::error::ApiError;
use super::pages;
use super::server::AppState;
use super::upload::Submission;

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "cadence-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "tasks": state.registry.len(),
    }))
}

/// Submission form.
pub async fn form(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::form_page(state.default_interval_secs))
}

/// Create a task from the multipart form.
pub async fn submit(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let created = match Submission::read(multipart).await {
        Ok(form) => form
            .into_spec(state.default_interval_secs)
            .and_then(|spec| state.registry.create(spec)),
        Err(e) => Err(e),
    };

    match created {
        Ok(id) => Html(pages::started_page(&id)).into_response(),
        Err(e) => {
            tracing::warn!("⚠️ Rejected submission: {e}");
            let error = ApiError::from(e);
            (error.status, Html(pages::error_page(&error.message))).into_response()
        }
    }
}

/// Live logs page. Unknown ids render an empty state rather than an error.
pub async fn logs_page(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Html<String> {
    match state.registry.logs(&id) {
        Ok(logs) => Html(pages::logs_page(&id, Some((logs.events.as_slice(), logs.actions.as_slice())))),
        Err(_) => Html(pages::logs_page(&id, None)),
    }
}

/// Stop link target. Unknown ids get a visible notice with a success status.
pub async fn stop_page(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Html<String> {
    let known = state.registry.stop(&id).is_ok();
    Html(pages::stopped_page(&id, known))
}

/// List all tasks.
pub async fn api_list_tasks(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let tasks = state.registry.list();
    Json(serde_json::json!({ "ok": true, "count": tasks.len(), "tasks": tasks }))
}

/// One task with both logs.
pub async fn api_get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let task = state.registry.get(&id)?;
    let logs = state.registry.logs(&id)?;
    Ok(Json(serde_json::json!({
        "ok": true,
        "task": task.summary(),
        "events": logs.events,
        "actions": logs.actions,
    })))
}

/// Stop a task.
pub async fn api_stop_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.registry.stop(&id)?;
    Ok(Json(serde_json::json!({ "ok": true, "id": id, "state": "stopped" })))
}
