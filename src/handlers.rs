// src/handlers.rs
use axum::{
    extract::Extension,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::workflow::WorkflowSnapshot;
use crate::AppState;

pub fn studio_routes() -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/document", get(get_document).put(put_document))
        .route("/api/generate", post(post_generate))
        .route("/api/render", post(post_render))
        .route("/api/status", get(api_status))
}

/// Full controller snapshot for the UI: phase, document, plan, render
/// result, error banner.
async fn get_state(Extension(state): Extension<Arc<AppState>>) -> Json<WorkflowSnapshot> {
    Json(state.controller.snapshot().await)
}

async fn get_document(Extension(state): Extension<Arc<AppState>>) -> String {
    state.controller.document_text().await
}

/// Replace the editable document with the request body as-is. The text is
/// not validated here; parsing happens when an action runs, so the operator
/// can save half-finished edits.
async fn put_document(
    Extension(state): Extension<Arc<AppState>>,
    body: String,
) -> Json<WorkflowSnapshot> {
    state.controller.set_document(body).await;
    Json(state.controller.snapshot().await)
}

/// Trigger plan generation. Workflow failures land in the snapshot's error
/// slot rather than an HTTP error status; the UI renders them as a banner.
async fn post_generate(Extension(state): Extension<Arc<AppState>>) -> Json<WorkflowSnapshot> {
    if let Err(e) = state.controller.generate().await {
        tracing::warn!("generate action failed: {}", e);
    }
    Json(state.controller.snapshot().await)
}

/// Trigger a render of the held plan. Same error convention as generate.
async fn post_render(Extension(state): Extension<Arc<AppState>>) -> Json<WorkflowSnapshot> {
    if let Err(e) = state.controller.render().await {
        tracing::warn!("render action failed: {}", e);
    }
    Json(state.controller.snapshot().await)
}

async fn api_status() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "broll_studio",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}
