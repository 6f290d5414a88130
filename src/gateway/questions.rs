use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use tracing::instrument;

use crate::gateway::error::GatewayError;
use crate::gateway::extract::{NO_DATA_MESSAGE, json_body};
use crate::gateway::payload::MessageResponse;
use crate::gateway::state::HandlerState;
use crate::storage::{Question, QuestionDraft};

pub const QUESTION_DELETED_MESSAGE: &str = "Question deleted successfully";

fn draft_from(body: &Bytes) -> Result<QuestionDraft, GatewayError> {
    json_body(body)?.ok_or_else(|| GatewayError::InvalidRequest(NO_DATA_MESSAGE.to_string()))
}

#[instrument(skip(state))]
pub async fn list_questions_handler(
    State(state): State<HandlerState>,
) -> Result<Json<Vec<Question>>, GatewayError> {
    let questions = state.questions.clone();
    let list = tokio::task::spawn_blocking(move || questions.list())
        .await
        .map_err(GatewayError::task_failed)??;
    Ok(Json(list))
}

#[instrument(skip(state, body))]
pub async fn create_question_handler(
    State(state): State<HandlerState>,
    body: Bytes,
) -> Result<Json<Question>, GatewayError> {
    let draft = draft_from(&body)?;
    let questions = state.questions.clone();
    let created = tokio::task::spawn_blocking(move || questions.create(draft))
        .await
        .map_err(GatewayError::task_failed)??;
    Ok(Json(created))
}

#[instrument(skip(state, body))]
pub async fn update_question_handler(
    State(state): State<HandlerState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Question>, GatewayError> {
    let draft = draft_from(&body)?;
    let questions = state.questions.clone();
    let updated = tokio::task::spawn_blocking(move || questions.update(&id, draft))
        .await
        .map_err(GatewayError::task_failed)??;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_question_handler(
    State(state): State<HandlerState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, GatewayError> {
    let questions = state.questions.clone();
    tokio::task::spawn_blocking(move || questions.delete(&id))
        .await
        .map_err(GatewayError::task_failed)??;
    Ok(Json(MessageResponse::new(QUESTION_DELETED_MESSAGE)))
}
