//! Influencer ranking, detail and score history.
//!
//! - `GET /api/v1/influencers`: ranked list with trust tiers
//! - `GET /api/v1/influencers/{id}`: detail with recent mentions
//! - `GET /api/v1/influencers/{id}/score-history`: rescore snapshots

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use trustrank_core::{Mention, SocialHandle};
use trustrank_db::{Influencer, InfluencerFilter};
use trustrank_score::TrustLevel;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState};

/// Resolve a path id (public UUID or slug) to an active influencer.
pub(super) async fn resolve_influencer(
    pool: &PgPool,
    id: &str,
    request_id: &str,
) -> Result<Influencer, ApiError> {
    let row = match Uuid::parse_str(id) {
        Ok(public_id) => trustrank_db::get_influencer_by_public_id(pool, public_id).await,
        Err(_) => trustrank_db::get_influencer_by_slug(pool, id).await,
    }
    .map_err(|e| map_db_error(request_id.to_owned(), &e))?;

    row.map(trustrank_db::InfluencerRow::into_domain)
        .ok_or_else(|| {
            ApiError::new(request_id, "not_found", format!("influencer '{id}' not found"))
        })
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(in crate::api) struct InfluencerSummary {
    pub public_id: Uuid,
    pub name: String,
    pub slug: String,
    pub niche: Option<String>,
    pub image_url: Option<String>,
    pub trust_score: f64,
    pub trust_level: TrustLevel,
    pub trust_label: &'static str,
    pub trust_color: &'static str,
    pub drama_count: i32,
    pub good_action_count: i32,
    pub neutral_count: i32,
    pub avg_sentiment: f64,
    pub social_handles: Vec<SocialHandle>,
    pub last_scored_at: Option<DateTime<Utc>>,
}

impl From<Influencer> for InfluencerSummary {
    fn from(influencer: Influencer) -> Self {
        let level = TrustLevel::from_score(influencer.trust_score);
        Self {
            public_id: influencer.public_id,
            name: influencer.name,
            slug: influencer.slug,
            niche: influencer.niche,
            image_url: influencer.image_url,
            trust_score: influencer.trust_score,
            trust_level: level,
            trust_label: level.label(),
            trust_color: level.color(),
            drama_count: influencer.drama_count,
            good_action_count: influencer.good_action_count,
            neutral_count: influencer.neutral_count,
            avg_sentiment: influencer.avg_sentiment,
            social_handles: influencer.social_handles,
            last_scored_at: influencer.last_scored_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct RankedInfluencer {
    pub rank: usize,
    #[serde(flatten)]
    pub influencer: InfluencerSummary,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct InfluencerDetail {
    #[serde(flatten)]
    pub influencer: InfluencerSummary,
    pub recent_mentions: Vec<Mention>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ScoreHistoryItem {
    pub ai_score: Decimal,
    pub community_score: Option<Decimal>,
    pub combined_score: i16,
    pub mention_count: i32,
    pub signal_count: i32,
    pub captured_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ListInfluencersQuery {
    pub min_trust_score: Option<f64>,
    pub niche: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

pub(in crate::api) async fn list_influencers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListInfluencersQuery>,
) -> Result<Json<ApiResponse<Vec<RankedInfluencer>>>, ApiError> {
    if query.min_trust_score.is_some_and(|s| !(0.0..=100.0).contains(&s)) {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "min_trust_score must be between 0 and 100",
        ));
    }

    let filter = InfluencerFilter {
        min_trust_score: query.min_trust_score,
        niche: query.niche,
        search: query.search,
    };
    let rows = trustrank_db::list_ranked_influencers(&state.pool, &filter, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| RankedInfluencer {
            rank: i + 1,
            influencer: row.into_domain().into(),
        })
        .collect();

    Ok(Json(ApiResponse::new(data, req_id.0)))
}

pub(in crate::api) async fn get_influencer(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<InfluencerDetail>>, ApiError> {
    let influencer = resolve_influencer(&state.pool, &id, &req_id.0).await?;

    let mentions =
        trustrank_db::list_mentions_for_influencer(&state.pool, influencer.id, state.mention_retention)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = InfluencerDetail {
        influencer: influencer.into(),
        recent_mentions: mentions
            .into_iter()
            .map(trustrank_db::MentionRow::into_domain)
            .collect(),
    };

    Ok(Json(ApiResponse::new(data, req_id.0)))
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct HistoryQuery {
    pub limit: Option<i64>,
}

pub(in crate::api) async fn list_score_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<ScoreHistoryItem>>>, ApiError> {
    let influencer = resolve_influencer(&state.pool, &id, &req_id.0).await?;

    let rows = trustrank_db::list_score_snapshots(
        &state.pool,
        influencer.id,
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|r| ScoreHistoryItem {
            ai_score: r.ai_score,
            community_score: r.community_score,
            combined_score: r.combined_score,
            mention_count: r.mention_count,
            signal_count: r.signal_count,
            captured_at: r.captured_at,
        })
        .collect();

    Ok(Json(ApiResponse::new(data, req_id.0)))
}
