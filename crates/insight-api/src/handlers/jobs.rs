use axum::extract::{Path, State};
use axum::Json;

use insight_core::JobView;
use insight_jobs::JOB_NOT_FOUND;

use super::parse_id;
use crate::error::ApiError;
use crate::AppState;

/// `GET /jobs/:id`
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobView>, ApiError> {
    let id = parse_id(&id, JOB_NOT_FOUND)?;
    Ok(Json(state.query.job(id).await?))
}
