use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use insight_core::{Submission, TranscriptView};
use insight_jobs::TRANSCRIPT_NOT_FOUND;

use super::parse_id;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitTranscriptRequest {
    #[serde(default)]
    pub content: String,
}

/// `POST /transcripts`
pub async fn submit_transcript(
    State(state): State<AppState>,
    body: Result<Json<SubmitTranscriptRequest>, JsonRejection>,
) -> Result<Json<Submission>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    debug!(
        subsystem = "api",
        component = "transcripts",
        op = "submit",
        content_len = request.content.len(),
        "Transcript submitted"
    );
    Ok(Json(state.gate.submit(&request.content).await?))
}

/// `GET /transcripts/:id`
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptView>, ApiError> {
    let id = parse_id(&id, TRANSCRIPT_NOT_FOUND)?;
    Ok(Json(state.query.transcript(id).await?))
}
