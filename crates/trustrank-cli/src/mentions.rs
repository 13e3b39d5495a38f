//! `mentions import`: load researched mentions from a JSON file.
//!
//! Records without a usable label are classified with the keyword classifier
//! before storage, and every stored mention carries its computed impact.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use trustrank_core::{Mention, MentionLabel, Severity};
use trustrank_db::NewMention;
use trustrank_score::{classify_content, keyword_sentiment, mention_impact, ScoreEngine};

/// One entry of the research JSON array.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResearchMention {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, alias = "source_url")]
    pub url: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "sentiment")]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
}

impl ResearchMention {
    /// `None` for records with blank text.
    pub(crate) fn into_new_mention(self, now: DateTime<Utc>) -> Option<NewMention> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }

        // Only the record's own sentiment is stored; a missing one stays
        // missing so it is left out of the mean.
        let sentiment = self.sentiment_score.filter(|s| s.is_finite());
        let estimated = sentiment.unwrap_or_else(|| keyword_sentiment(text));

        let label = self
            .label
            .as_deref()
            .and_then(MentionLabel::parse)
            .unwrap_or_else(|| classify_content(text, estimated).label);

        let severity = self.severity.as_deref().and_then(|s| match s.parse::<Severity>() {
            Ok(sev) => Some(sev),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unknown severity on research mention");
                None
            }
        });

        Some(NewMention {
            source: self
                .source
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
            source_url: self.url.filter(|u| !u.trim().is_empty()),
            text_excerpt: text.to_string(),
            sentiment_score: sentiment,
            label,
            severity,
            score_impact: mention_impact(label, severity, Some(estimated)),
            scraped_at: self.scraped_at.unwrap_or(now),
        })
    }
}

/// Parse the research file and convert every usable record.
///
/// Returns the converted mentions and the number of blank records dropped.
pub(crate) fn parse_research_file(
    content: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<(Vec<NewMention>, usize)> {
    let records: Vec<ResearchMention> =
        serde_json::from_str(content).context("research file must be a JSON array of mentions")?;
    let total = records.len();
    let mentions: Vec<NewMention> = records
        .into_iter()
        .filter_map(|r| r.into_new_mention(now))
        .collect();
    let dropped = total - mentions.len();
    Ok((mentions, dropped))
}

/// Preview view of unsaved mentions, so a dry run can score them.
fn preview(influencer_id: i64, mentions: &[NewMention]) -> Vec<Mention> {
    mentions
        .iter()
        .zip(1_i64..)
        .map(|(m, id)| Mention {
            id,
            influencer_id,
            source: m.source.clone(),
            source_url: m.source_url.clone(),
            text_excerpt: m.text_excerpt.clone(),
            sentiment_score: m.sentiment_score,
            label: Some(m.label),
            severity: m.severity,
            score_impact: Some(m.score_impact),
            is_verified: false,
            scraped_at: m.scraped_at,
        })
        .collect()
}

/// Replace an influencer's mentions with the file's contents and rescore.
///
/// # Errors
///
/// Returns an error if the influencer is unknown, the file cannot be read or
/// parsed, or any database operation fails.
pub(crate) async fn run_import(
    pool: &sqlx::PgPool,
    config: &trustrank_core::AppConfig,
    slug: &str,
    file: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    let influencer = trustrank_db::get_influencer_by_slug(pool, slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("influencer '{slug}' not found"))?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let (mentions, dropped) = parse_research_file(&content, Utc::now())?;
    if dropped > 0 {
        tracing::warn!(dropped, "skipped research records with blank text");
    }

    let count = |label: MentionLabel| mentions.iter().filter(|m| m.label == label).count();
    println!(
        "{slug}: {} mentions ({} drama, {} good_action, {} neutral)",
        mentions.len(),
        count(MentionLabel::Drama),
        count(MentionLabel::GoodAction),
        count(MentionLabel::Neutral),
    );

    let engine = ScoreEngine::new(config.scoring.clone());

    if dry_run {
        let ai = engine.compute_ai_score(&preview(influencer.id, &mentions));
        println!("dry-run: projected AI score {:.2}; nothing written", ai.total);
        return Ok(());
    }

    let inserted = trustrank_db::replace_mentions(pool, influencer.id, &mentions).await?;
    let outcome = trustrank_db::rescore_influencer(
        pool,
        &engine,
        influencer.id,
        config.mention_retention,
        false,
    )
    .await?;

    println!(
        "imported {inserted} mentions; trust score {:.2} (combined {})",
        outcome.trust_score, outcome.combined_score
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn record(text: &str) -> ResearchMention {
        ResearchMention {
            source: Some("news".to_string()),
            url: None,
            text: text.to_string(),
            sentiment_score: None,
            label: None,
            severity: None,
            scraped_at: None,
        }
    }

    #[test]
    fn explicit_label_is_kept() {
        let mut r = record("a calm interview");
        r.label = Some("good_action".to_string());
        r.sentiment_score = Some(0.5);

        let m = r.into_new_mention(now()).expect("converted");
        assert_eq!(m.label, MentionLabel::GoodAction);
        assert_eq!(m.sentiment_score, Some(0.5));
        // 10 * 1.0 + 0.5 * 5
        assert!((m.score_impact - 12.5).abs() < 1e-9);
        assert_eq!(m.scraped_at, now());
    }

    #[test]
    fn unlabeled_record_is_classified_from_keywords() {
        let mut r = record("Énorme polémique après cette arnaque");
        r.sentiment_score = Some(-0.6);

        let m = r.into_new_mention(now()).expect("converted");
        assert_eq!(m.label, MentionLabel::Drama);
        assert!(m.score_impact < -15.0);
    }

    #[test]
    fn missing_sentiment_is_estimated_for_classification_only() {
        let m = record("scandale et arnaque")
            .into_new_mention(now())
            .expect("converted");
        assert_eq!(m.sentiment_score, None);
        assert_eq!(m.label, MentionLabel::Drama);
        // -15 base, keyword sentiment -1.0 * 5
        assert!((m.score_impact + 20.0).abs() < 1e-9);
    }

    #[test]
    fn labelled_record_without_sentiment_stays_unscored() {
        let json = r#"[
            {"text": "charity stream", "label": "good_action", "sentiment_score": 0.9},
            {"text": "plain update", "label": "neutral"}
        ]"#;

        let (mentions, _) = parse_research_file(json, now()).expect("parsed");
        assert_eq!(mentions[0].sentiment_score, Some(0.9));
        assert_eq!(mentions[1].sentiment_score, None);

        let ai = ScoreEngine::default().compute_ai_score(&preview(1, &mentions));
        assert!((ai.avg_sentiment - 0.9).abs() < 1e-9);
    }

    #[test]
    fn non_finite_sentiment_is_not_stored() {
        let mut r = record("plain update");
        r.label = Some("neutral".to_string());
        r.sentiment_score = Some(f64::NAN);

        let m = r.into_new_mention(now()).expect("converted");
        assert_eq!(m.sentiment_score, None);
    }

    #[test]
    fn unknown_label_and_severity_are_ignored() {
        let mut r = record("nothing notable");
        r.label = Some("gossip".to_string());
        r.severity = Some("EXTREME".to_string());
        r.sentiment_score = Some(0.0);

        let m = r.into_new_mention(now()).expect("converted");
        assert_eq!(m.label, MentionLabel::Neutral);
        assert_eq!(m.severity, None);
        assert_eq!(m.score_impact, 0.0);
    }

    #[test]
    fn blank_text_is_dropped() {
        assert!(record("   ").into_new_mention(now()).is_none());
    }

    #[test]
    fn parse_research_file_counts_dropped_records() {
        let json = r#"[
            {"source": "youtube", "url": "https://example.com/v", "text": "charity stream for a good cause", "sentiment_score": 0.7},
            {"text": ""},
            {"text": "plain update", "label": "neutral", "scraped_at": "2024-05-01T10:00:00Z"}
        ]"#;

        let (mentions, dropped) = parse_research_file(json, now()).expect("parsed");
        assert_eq!(mentions.len(), 2);
        assert_eq!(dropped, 1);
        assert_eq!(mentions[0].source_url.as_deref(), Some("https://example.com/v"));
        assert_eq!(mentions[1].source, "unknown");
        assert_eq!(
            mentions[1].scraped_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single().expect("ts")
        );
    }

    #[test]
    fn parse_research_file_rejects_non_array() {
        assert!(parse_research_file(r#"{"text": "x"}"#, now()).is_err());
    }

    #[test]
    fn preview_assigns_ids_and_labels() {
        let (mentions, _) = parse_research_file(
            r#"[{"text": "a", "label": "drama", "sentiment_score": -0.5}]"#,
            now(),
        )
        .expect("parsed");
        let preview = preview(7, &mentions);
        assert_eq!(preview[0].id, 1);
        assert_eq!(preview[0].influencer_id, 7);
        assert_eq!(preview[0].label, Some(MentionLabel::Drama));
    }
}
