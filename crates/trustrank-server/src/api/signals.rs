//! Community ratings and reports, and their moderation.
//!
//! - POST  /api/v1/influencers/{id}/signals
//! - PATCH /api/v1/signals/{id}/status
//! - PATCH /api/v1/signals/{id}/visibility

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trustrank_core::{NewCommunitySignal, SignalStatus, SignalType};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::influencers::resolve_influencer;
use super::{map_db_error, ApiError, ApiResponse, AppState};

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(in crate::api) struct SubmitSignalRequest {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub signal_type: String,
    pub rating: Option<i16>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateVisibilityRequest {
    pub is_hidden: bool,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct SignalItem {
    pub id: i64,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub signal_type: String,
    pub rating: Option<i16>,
    pub comment: Option<String>,
    pub status: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<trustrank_db::CommunitySignalRow> for SignalItem {
    fn from(row: trustrank_db::CommunitySignalRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            signal_type: row.signal_type,
            rating: row.rating,
            comment: row.comment,
            status: row.status,
            is_hidden: row.is_hidden,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn map_constraint_violation(req_id: &str, e: &trustrank_db::DbError) -> ApiError {
    if let trustrank_db::DbError::Sqlx(sqlx::Error::Database(db_err)) = e {
        match db_err.code().as_deref() {
            Some("23514") => {
                return ApiError::new(
                    req_id,
                    "validation_error",
                    "signal violates a table constraint",
                );
            }
            Some("23505") => {
                return ApiError::new(
                    req_id,
                    "conflict",
                    "an identical report already exists for this influencer",
                );
            }
            _ => {}
        }
    }
    map_db_error(req_id.to_owned(), e)
}

fn parse_signal_id(id: &str, req_id: &str) -> Result<i64, ApiError> {
    id.parse::<i64>()
        .map_err(|_| ApiError::new(req_id, "not_found", format!("signal '{id}' not found")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Create the user's signal of this type, or replace their previous one.
///
/// Reports whose normalized comment matches another user's live report on the
/// same influencer are refused with `conflict`.
pub(in crate::api) async fn submit_signal(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<SubmitSignalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SignalItem>>), ApiError> {
    let rid = &req_id.0;

    let signal_type = body
        .signal_type
        .parse::<SignalType>()
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    let influencer = resolve_influencer(&state.pool, &id, rid).await?;

    let signal = NewCommunitySignal {
        influencer_id: influencer.id,
        user_id: body.user_id,
        signal_type,
        rating: body.rating,
        comment: body.comment,
    };
    signal
        .validate()
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    if signal_type.is_report() {
        if let Some(hash) = signal.content_hash() {
            let duplicate = trustrank_db::find_report_by_content_hash(
                &state.pool,
                influencer.id,
                &hash,
                signal.user_id,
            )
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?;

            if let Some(existing) = duplicate {
                tracing::info!(
                    influencer_id = influencer.id,
                    existing_signal_id = existing.id,
                    "duplicate report refused"
                );
                return Err(ApiError::new(
                    rid,
                    "conflict",
                    "an identical report already exists for this influencer",
                ));
            }
        }
    }

    let row = trustrank_db::upsert_community_signal(&state.pool, &signal)
        .await
        .map_err(|e| map_constraint_violation(rid, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(row.into(), req_id.0)),
    ))
}

/// Verify, reject, or reopen a signal.
///
/// Only verified signals count toward the community score under the default
/// counting policy. Scores pick up the change on the next rescore; the
/// breakdown endpoint reflects it immediately.
pub(in crate::api) async fn update_signal_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<SignalItem>>, ApiError> {
    let rid = &req_id.0;

    let signal_id = parse_signal_id(&id, rid)?;
    let status = body
        .status
        .parse::<SignalStatus>()
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    let row = trustrank_db::update_signal_status(&state.pool, signal_id, status)
        .await
        .map_err(|e| map_constraint_violation(rid, &e))?;

    tracing::info!(signal_id, status = %status, "signal status updated");

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}

/// Hide a signal from listings and scoring, or restore it.
pub(in crate::api) async fn update_signal_visibility(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<UpdateVisibilityRequest>,
) -> Result<Json<ApiResponse<SignalItem>>, ApiError> {
    let rid = &req_id.0;

    let signal_id = parse_signal_id(&id, rid)?;
    let row = trustrank_db::set_signal_hidden(&state.pool, signal_id, body.is_hidden)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(signal_id, is_hidden = body.is_hidden, "signal visibility updated");

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}
