use sqlx::types::Json;
use sqlx::PgPool;
use trustrank_core::InfluencerConfig;

use crate::DbError;

/// Upsert influencers from the seed file, keyed by slug.
///
/// Returns the number of influencers processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back. Scores and tallies are left untouched
/// on update.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_influencers(
    pool: &PgPool,
    influencers: &[InfluencerConfig],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for influencer in influencers {
        let slug = influencer.slug();

        sqlx::query(
            "INSERT INTO influencers (name, slug, niche, image_url, notes, social_handles, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, true) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 niche = EXCLUDED.niche, \
                 image_url = EXCLUDED.image_url, \
                 notes = EXCLUDED.notes, \
                 social_handles = EXCLUDED.social_handles, \
                 is_active = true, \
                 updated_at = NOW()",
        )
        .bind(&influencer.name)
        .bind(&slug)
        .bind(influencer.niche.as_deref())
        .bind(influencer.image_url.as_deref())
        .bind(influencer.notes.as_deref())
        .bind(Json(&influencer.social))
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    tracing::info!(count, "seeded influencers");
    Ok(count)
}
