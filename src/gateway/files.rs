use std::path::Path;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use chrono::Utc;
use tracing::{info, instrument};

use crate::gateway::error::GatewayError;
use crate::gateway::extract::UploadForm;
use crate::gateway::payload::{ExtractTextResponse, MessageResponse};
use crate::gateway::state::HandlerState;
use crate::ocr::extract_text;
use crate::storage::TeacherGuide;

pub const GUIDE_UPLOADED_MESSAGE: &str = "Teacher guide uploaded successfully!";

/// Stores a marking guide and records it in the guide log.
#[instrument(skip(state, multipart))]
pub async fn upload_teacher_guide_handler(
    State(state): State<HandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, GatewayError> {
    let file = UploadForm::read(multipart, "file").await?.require_file()?;

    let stored = state
        .uploads
        .save_teacher_guide(&file.file_name, &file.bytes)
        .await?;
    let file_path = relative_to(&stored, &state.data_dir);

    let guides = state.teacher_guides.clone();
    let guide = tokio::task::spawn_blocking(move || {
        guides.append_with(|id| TeacherGuide {
            id,
            file_path,
            uploaded_at: Utc::now().to_rfc3339(),
        })
    })
    .await
    .map_err(GatewayError::task_failed)??;

    info!(id = guide.id, path = %guide.file_path, "Teacher guide uploaded");
    Ok(Json(MessageResponse::new(GUIDE_UPLOADED_MESSAGE)))
}

/// OCRs an uploaded image or PDF and returns the text.
#[instrument(skip(state, multipart))]
pub async fn extract_text_handler(
    State(state): State<HandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractTextResponse>, GatewayError> {
    let file = UploadForm::read(multipart, "file").await?.require_file()?;
    let extracted_text = extract_text(state.ocr.as_ref(), &file.file_name, &file.bytes).await?;
    Ok(Json(ExtractTextResponse { extracted_text }))
}

fn relative_to(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
