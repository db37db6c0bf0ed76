use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::ranking_config::{RankingConfig, RankingConfigError};
use crate::models::{Place, PlaceSignal, RecommendationCandidate, Tag};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Computes component scores and the blended ranking score
///
/// All scores are in [0, 1]. The social boost is the one exception, bounded
/// by `max_social_boost` and normalized before blending.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: RankingConfig,
}

impl ScoringEngine {
    pub fn new(config: RankingConfig) -> Result<Self, RankingConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Matching tags and their share of the larger of the two tag sets
    pub fn tag_confidence(
        &self,
        preferred: &BTreeSet<Tag>,
        place_tags: &BTreeSet<Tag>,
    ) -> (BTreeSet<Tag>, f64) {
        let matching: BTreeSet<Tag> = preferred.intersection(place_tags).cloned().collect();
        if matching.is_empty() {
            return (matching, 0.0);
        }

        let denominator = preferred.len().max(place_tags.len()) as f64;
        let confidence = matching.len() as f64 / denominator;
        (matching, confidence)
    }

    pub fn social_trust_boost(&self, signal: &PlaceSignal) -> f64 {
        if signal.reviewer_ids.is_empty() {
            return 0.0;
        }

        let trusted_share = signal.trusted_reviewer_count as f64 / signal.reviewer_ids.len() as f64;
        trusted_share.min(1.0) * self.config.max_social_boost
    }

    pub fn popularity_score(&self, review_count: usize, average_rating: f64) -> f64 {
        let config = &self.config;

        if review_count < config.popularity_min_reviews {
            return 0.0;
        }
        if average_rating < config.popularity_rating_floor {
            return config.low_rated_popularity;
        }

        let volume =
            (review_count as f64 / config.popularity_saturation_reviews as f64).min(1.0);
        let bonus = if average_rating >= config.popularity_bonus_rating {
            config.popularity_bonus
        } else {
            0.0
        };

        (volume + bonus).min(1.0)
    }

    /// Recency score; `None` for places with no creation date
    pub fn novelty_score(&self, created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
        let config = &self.config;

        let Some(created_at) = created_at else {
            return config.novelty_unknown;
        };

        let age_days = (now - created_at).num_seconds() as f64 / SECONDS_PER_DAY;

        if age_days <= config.novelty_fresh_days {
            1.0
        } else if age_days <= config.novelty_decay_end_days {
            let window = config.novelty_decay_end_days - config.novelty_fresh_days;
            let progress = (age_days - config.novelty_fresh_days) / window;
            1.0 - progress * (1.0 - config.novelty_decay_floor)
        } else {
            config.novelty_stale
        }
    }

    pub fn quality_score(&self, average_rating: f64) -> f64 {
        (average_rating / self.config.max_rating).clamp(0.0, 1.0)
    }

    /// Weighted blend of the component scores
    pub fn final_score(
        &self,
        tag_confidence: f64,
        social_trust_boost: f64,
        popularity: f64,
        quality: f64,
        novelty: f64,
    ) -> f64 {
        let weights = &self.config.weights;
        let social = social_trust_boost / self.config.max_social_boost;

        let score = weights.tag_match * tag_confidence
            + weights.social_trust * social
            + weights.popularity * popularity
            + weights.quality * quality
            + weights.novelty * novelty;

        // Weights sum to 1.0 only up to float rounding
        score.clamp(0.0, 1.0)
    }

    pub fn score(
        &self,
        place: Place,
        signal: PlaceSignal,
        preferred: &BTreeSet<Tag>,
        now: DateTime<Utc>,
    ) -> RecommendationCandidate {
        let (matching_tags, tag_confidence) = self.tag_confidence(preferred, &signal.tag_set);
        let social_trust_boost = self.social_trust_boost(&signal);
        let popularity_score = self.popularity_score(signal.review_count, signal.average_rating);
        let novelty_score = self.novelty_score(place.created_at, now);
        let quality_score = self.quality_score(signal.average_rating);

        let final_ranking_score = self.final_score(
            tag_confidence,
            social_trust_boost,
            popularity_score,
            quality_score,
            novelty_score,
        );

        RecommendationCandidate {
            place,
            signal,
            matching_tags,
            tag_confidence,
            social_trust_boost,
            popularity_score,
            novelty_score,
            quality_score,
            final_ranking_score,
        }
    }
}
