//! HTTP gateway (Axum) for grading, question management and file uploads.
//!
//! This module is primarily used by the `grader` server binary.

pub mod error;
pub mod extract;
pub mod files;
pub mod handler;
pub mod payload;
pub mod questions;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use state::HandlerState;

use crate::embedding::device::device_label;
use files::{extract_text_handler, upload_teacher_guide_handler};
use handler::{
    api_evaluate_handler, evaluate_handler, get_results_handler, upload_assignment_handler,
};
use questions::{
    create_question_handler, delete_question_handler, list_questions_handler,
    update_question_handler,
};

pub const ROOT_MESSAGE: &str = "Backend is running!";

const STATUS_READY: &str = "ready";
const STATUS_ERROR: &str = "error";

pub fn create_router_with_state(state: HandlerState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/", get(root_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/evaluate", post(evaluate_handler))
        .route("/upload_assignment", post(upload_assignment_handler))
        .route(
            "/get_results/{user_id}/{user_type}",
            get(get_results_handler),
        )
        .route(
            "/questions",
            get(list_questions_handler).post(create_question_handler),
        )
        .route(
            "/questions/{id}",
            put(update_question_handler).delete(delete_question_handler),
        )
        .route("/upload_teacher_guide", post(upload_teacher_guide_handler))
        .route("/extract_text_from_file", post(extract_text_handler))
        .route("/api/evaluate", post(api_evaluate_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub storage: &'static str,
    pub embedding: &'static str,
    pub embedder_mode: &'static str,
    pub device: &'static str,
}

pub async fn root_handler() -> &'static str {
    ROOT_MESSAGE
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let storage_status = if state.data_dir.is_dir() {
        STATUS_READY
    } else {
        STATUS_ERROR
    };

    let embedder = state.scorer.embedder();
    let embedder_mode = if embedder.is_stub() { "stub" } else { "real" };

    let components = ComponentStatus {
        http: STATUS_READY,
        storage: storage_status,
        embedding: STATUS_READY,
        embedder_mode,
        device: device_label(embedder.device()),
    };

    let is_ready = components.storage == STATUS_READY && components.embedding == STATUS_READY;
    let (status_code, status_msg) = if is_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "pending")
    };

    (
        status_code,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
