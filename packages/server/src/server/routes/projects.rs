//! Project-scoped routes: scheduling analysis, listing patterns and pages.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use mining::{ContentBlockPattern, Page, PageStore, PatternStore};

use crate::kernel::jobs::schedule_analysis;
use crate::server::app::AppState;
use crate::server::routes::ApiError;

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub enqueued: usize,
}

/// Enqueue an analysis job for every eligible page of the project.
///
/// Purely asynchronous: the response only carries the enqueued count;
/// per-page outcomes surface later through page status.
pub async fn schedule_analysis_handler(
    Extension(state): Extension<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ScheduleResponse>), ApiError> {
    let enqueued = schedule_analysis(project_id, state.pages.as_ref(), &state.queue).await?;

    Ok((StatusCode::ACCEPTED, Json(ScheduleResponse { enqueued })))
}

/// The project's pattern library, most frequent shapes first.
pub async fn list_patterns_handler(
    Extension(state): Extension<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<ContentBlockPattern>>, ApiError> {
    let patterns = state.patterns.list_patterns(project_id).await?;
    Ok(Json(patterns))
}

/// All pages of the project with their current analysis status.
pub async fn list_pages_handler(
    Extension(state): Extension<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Page>>, ApiError> {
    let pages = state.pages.list_pages(project_id).await?;
    Ok(Json(pages))
}
