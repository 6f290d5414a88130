use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::gateway::error::GatewayError;
use crate::gateway::extract::{NO_DATA_MESSAGE, UploadForm, json_body};
use crate::gateway::payload::{
    ApiEvaluateRequest, ApiEvaluateResponse, EvaluateRequest, EvaluateResponse,
    SubmissionResponse,
};
use crate::gateway::state::HandlerState;
use crate::ocr::extract_text;
use crate::scoring::{Grade, length_score};
use crate::storage::{AnswerRecord, NewSubmission, Submission, sanitize_file_name};

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
pub const ASSIGNMENT_SUBMITTED_MESSAGE: &str = "Assignment submitted successfully!";
pub const ANSWER_EVALUATED_MESSAGE: &str = "Answer evaluated successfully";

/// Scores a student answer against a model answer.
#[instrument(skip(state, body))]
pub async fn evaluate_handler(
    State(state): State<HandlerState>,
    body: Bytes,
) -> Result<Json<EvaluateResponse>, GatewayError> {
    let request: EvaluateRequest = json_body(&body)?
        .ok_or_else(|| GatewayError::InvalidRequest(NO_DATA_MESSAGE.to_string()))?;

    let (Some(_), Some(model_answer), Some(student_answer)) =
        (request.question, request.model_answer, request.student_answer)
    else {
        return Err(GatewayError::InvalidRequest(
            MISSING_FIELDS_MESSAGE.to_string(),
        ));
    };

    let scorer = state.scorer.clone();
    let score = tokio::task::spawn_blocking(move || scorer.score(&model_answer, &student_answer))
        .await
        .map_err(GatewayError::task_failed)??;

    debug!(score, "Evaluated answer");
    Ok(Json(EvaluateResponse { score }))
}

/// Grades an assignment submitted as text, a file, or both.
///
/// A file without text is OCR'd and the extracted text is graded.
#[instrument(skip(state, multipart))]
pub async fn upload_assignment_handler(
    State(state): State<HandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmissionResponse>, GatewayError> {
    let form = UploadForm::read(multipart, "file").await?;

    let (Some(student_id), Some(question_id)) = (form.text("student_id"), form.text("question_id"))
    else {
        return Err(GatewayError::InvalidRequest(
            "Missing student_id or question_id".to_string(),
        ));
    };
    let student_id = student_id.to_string();
    let question_id = question_id.to_string();
    let text_answer = form.text("text_answer").map(str::to_string);

    if text_answer.is_none() && form.file.is_none() {
        return Err(GatewayError::InvalidRequest(
            "Either text_answer or file must be provided".to_string(),
        ));
    }

    let questions = state.questions.clone();
    let lookup_id = question_id.clone();
    let question = tokio::task::spawn_blocking(move || questions.get(&lookup_id))
        .await
        .map_err(GatewayError::task_failed)??;

    let file_name = form
        .file
        .as_ref()
        .map(|file| sanitize_file_name(&file.file_name))
        .transpose()?;

    let answer = match (&text_answer, &form.file) {
        (Some(text), _) => text.clone(),
        (None, Some(file)) => extract_text(state.ocr.as_ref(), &file.file_name, &file.bytes).await?,
        (None, None) => String::new(),
    };

    let scorer = state.scorer.clone();
    let reference = question.correct_answer.clone();
    let graded_answer = answer.clone();
    let Grade { score, feedback } =
        tokio::task::spawn_blocking(move || scorer.grade(&reference, &graded_answer))
            .await
            .map_err(GatewayError::task_failed)??;

    // Only graded submissions keep their file.
    let stored = match (&form.file, &file_name) {
        (Some(file), Some(name)) => {
            let path = state.uploads.save_assignment(name, &file.bytes).await?;
            debug!(path = %path.display(), "Assignment file stored");
            Some(path)
        }
        _ => None,
    };

    let new = NewSubmission {
        student_id,
        question_id: question_id.clone(),
        text_answer: Some(answer).filter(|a| !a.is_empty()),
        file_path: file_name,
        score,
        feedback: feedback.message().to_string(),
    };
    let submissions = state.submissions.clone();
    let appended = tokio::task::spawn_blocking(move || submissions.append(new))
        .await
        .map_err(GatewayError::task_failed)
        .and_then(|result| result.map_err(GatewayError::from));
    let submission = match appended {
        Ok(submission) => submission,
        Err(e) => {
            if let Some(path) = stored {
                discard_upload(&path).await;
            }
            return Err(e);
        }
    };

    let questions = state.questions.clone();
    let count_result =
        tokio::task::spawn_blocking(move || questions.increment_submission_count(&question_id))
            .await
            .map_err(GatewayError::task_failed)?;
    if let Err(e) = count_result {
        warn!(error = %e, "Submission saved but question count was not updated");
    }

    info!(id = %submission.id, score, feedback = feedback.label(), "Assignment graded");
    Ok(Json(SubmissionResponse {
        message: ASSIGNMENT_SUBMITTED_MESSAGE.to_string(),
        score,
        feedback: feedback.message().to_string(),
    }))
}

async fn discard_upload(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove orphaned upload");
    }
}

/// Lists one student's submissions, or every submission for a teacher.
#[instrument(skip(state))]
pub async fn get_results_handler(
    State(state): State<HandlerState>,
    Path((user_id, user_type)): Path<(String, String)>,
) -> Result<Json<Vec<Submission>>, GatewayError> {
    let submissions = state.submissions.clone();
    let results = match user_type.as_str() {
        "student" => tokio::task::spawn_blocking(move || submissions.for_student(&user_id)).await,
        "teacher" => tokio::task::spawn_blocking(move || submissions.list()).await,
        _ => {
            return Err(GatewayError::InvalidRequest(
                "Invalid user type".to_string(),
            ));
        }
    }
    .map_err(GatewayError::task_failed)??;

    Ok(Json(results))
}

/// Scores a single answer and logs it.
///
/// With a `model_answer` this is the similarity score; without one it falls back to the
/// length heuristic.
#[instrument(skip(state, body))]
pub async fn api_evaluate_handler(
    State(state): State<HandlerState>,
    body: Bytes,
) -> Result<Json<ApiEvaluateResponse>, GatewayError> {
    let request: ApiEvaluateRequest = json_body(&body)?.unwrap_or_default();
    let Some(answer) = request.answer else {
        return Err(GatewayError::InvalidRequest(
            "No answer provided".to_string(),
        ));
    };

    let score = match request.model_answer {
        Some(model_answer) => {
            let scorer = state.scorer.clone();
            let candidate = answer.clone();
            tokio::task::spawn_blocking(move || scorer.score(&model_answer, &candidate))
                .await
                .map_err(GatewayError::task_failed)??
        }
        None => length_score(&answer),
    };

    let answers = state.answers.clone();
    let record = tokio::task::spawn_blocking(move || {
        answers.append_with(|id| AnswerRecord {
            id,
            text: answer,
            score,
            created_at: Utc::now().to_rfc3339(),
        })
    })
    .await
    .map_err(GatewayError::task_failed)??;

    debug!(id = record.id, score, "Answer logged");
    Ok(Json(ApiEvaluateResponse {
        score,
        message: ANSWER_EVALUATED_MESSAGE.to_string(),
    }))
}
