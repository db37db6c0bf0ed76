use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Coordinates, Place, PlaceCategory, PlaceId, Tag, UserId};

/// Review aggregates for one place, recomputed per request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceSignal {
    /// Mean of per-review mean ratings, in [0, 5]
    pub average_rating: f64,
    pub review_count: usize,
    pub reviewer_ids: BTreeSet<UserId>,
    pub tag_set: BTreeSet<Tag>,
    pub trusted_reviewer_count: usize,
}

/// A place with its signals and component scores
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationCandidate {
    pub place: Place,
    pub signal: PlaceSignal,
    pub matching_tags: BTreeSet<Tag>,
    pub tag_confidence: f64,
    /// Share of trusted reviewers scaled to at most the configured cap
    pub social_trust_boost: f64,
    pub popularity_score: f64,
    pub novelty_score: f64,
    pub quality_score: f64,
    pub final_ranking_score: f64,
}

impl RecommendationCandidate {
    pub fn category(&self) -> PlaceCategory {
        self.place.category
    }

    pub fn average_rating(&self) -> f64 {
        self.signal.average_rating
    }
}

/// Ranked place as returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedPlace {
    pub id: PlaceId,
    pub name: String,
    pub category: PlaceCategory,
    pub city: String,
    pub coordinates: Option<Coordinates>,
    pub description: Option<String>,
    pub verified: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub average_rating: f64,
    pub review_count: usize,
    pub matching_tags: Vec<Tag>,
    pub tag_confidence: f64,
    pub trusted_reviewers_count: usize,
    pub social_trust_boost: f64,
    pub popularity_score: f64,
    pub novelty_score: f64,
    pub final_ranking_score: f64,
}

impl From<RecommendationCandidate> for RecommendedPlace {
    fn from(candidate: RecommendationCandidate) -> Self {
        let RecommendationCandidate {
            place,
            signal,
            matching_tags,
            tag_confidence,
            social_trust_boost,
            popularity_score,
            novelty_score,
            final_ranking_score,
            ..
        } = candidate;

        RecommendedPlace {
            id: place.id,
            name: place.name,
            category: place.category,
            city: place.city,
            coordinates: place.coordinates,
            description: place.description,
            verified: place.verified,
            created_at: place.created_at,
            average_rating: signal.average_rating,
            review_count: signal.review_count,
            matching_tags: matching_tags.into_iter().collect(),
            tag_confidence,
            trusted_reviewers_count: signal.trusted_reviewer_count,
            social_trust_boost,
            popularity_score,
            novelty_score,
            final_ranking_score,
        }
    }
}
