//! `GET /api/v1/influencers/{id}/score-breakdown`

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use trustrank_score::ScoreBreakdown;

use crate::middleware::RequestId;

use super::influencers::resolve_influencer;
use super::{map_db_error, ApiError, ApiResponse, AppState};

pub(in crate::api) async fn get_score_breakdown(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ScoreBreakdown>>, ApiError> {
    let influencer = resolve_influencer(&state.pool, &id, &req_id.0).await?;

    let snapshot = trustrank_db::load_scoring_snapshot(
        &state.pool,
        influencer.id,
        state.mention_retention,
        trustrank_db::DEFAULT_SIGNAL_LIMIT,
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let breakdown = state
        .engine
        .breakdown_for(&snapshot.mentions, &snapshot.signals);

    if breakdown.skipped_records > 0 {
        tracing::warn!(
            influencer_id = influencer.id,
            skipped = breakdown.skipped_records,
            "breakdown skipped malformed records"
        );
    }

    Ok(Json(ApiResponse::new(breakdown, req_id.0)))
}
