//! Pattern routes: operator-driven reclassification.

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use mining::{CanonicalType, ContentBlockPattern, PatternStore};

use crate::server::app::AppState;
use crate::server::routes::ApiError;

#[derive(Debug, Deserialize)]
pub struct ReclassifyRequest {
    pub canonical_type: CanonicalType,
}

/// Assign a canonical type to a pattern.
///
/// Idempotent; answers 404 for an unknown pattern id.
pub async fn reclassify_handler(
    Extension(state): Extension<AppState>,
    Path(pattern_id): Path<Uuid>,
    Json(request): Json<ReclassifyRequest>,
) -> Result<Json<ContentBlockPattern>, ApiError> {
    let updated = state
        .patterns
        .reclassify(pattern_id, request.canonical_type)
        .await?;

    Ok(Json(updated))
}
