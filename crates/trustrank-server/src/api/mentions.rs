//! PATCH /api/v1/mentions/{id}/severity: moderator severity review.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use trustrank_core::{Mention, Severity};
use trustrank_score::mention_impact;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateSeverityRequest {
    pub severity: String,
    pub verified_by: String,
}

/// Set a mention's severity and recompute its stored impact.
///
/// The influencer's trust score picks up the change on the next rescore.
pub(in crate::api) async fn update_severity(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSeverityRequest>,
) -> Result<Json<ApiResponse<Mention>>, ApiError> {
    let rid = &req_id.0;

    let mention_id = id
        .parse::<i64>()
        .map_err(|_| ApiError::new(rid, "not_found", format!("mention '{id}' not found")))?;

    let severity = body
        .severity
        .parse::<Severity>()
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    let verified_by = body.verified_by.trim();
    if verified_by.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "verified_by must not be blank",
        ));
    }

    let current = trustrank_db::get_mention(&state.pool, mention_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", format!("mention '{id}' not found")))?
        .into_domain();

    let impact = current.label.map_or_else(
        || current.score_impact.unwrap_or(0.0),
        |label| mention_impact(label, Some(severity), current.sentiment_score),
    );

    let updated =
        trustrank_db::update_mention_severity(&state.pool, mention_id, severity, impact, verified_by)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(
        mention_id,
        severity = %severity,
        impact,
        "mention severity updated"
    );

    Ok(Json(ApiResponse::new(updated.into_domain(), req_id.0)))
}
