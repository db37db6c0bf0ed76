//! Every weight, threshold and cap used to rank places.
//!
//! Changing a default here re-ranks every request. The tests in this crate
//! pin the defaults, so a change has to be made deliberately.

use thiserror::Error;

/// Blend weights for the final ranking score, summing to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub tag_match: f64,
    pub social_trust: f64,
    pub popularity: f64,
    pub quality: f64,
    pub novelty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            tag_match: 0.35,
            social_trust: 0.25,
            popularity: 0.20,
            quality: 0.15,
            novelty: 0.05,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.tag_match + self.social_trust + self.popularity + self.quality + self.novelty
    }

    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("tag_match", self.tag_match),
            ("social_trust", self.social_trust),
            ("popularity", self.popularity),
            ("quality", self.quality),
            ("novelty", self.novelty),
        ]
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RankingConfigError {
    #[error("Scoring weights must sum to 1.0, got {0}")]
    WeightsDoNotSumToOne(f64),

    #[error("Scoring weight '{0}' is negative")]
    NegativeWeight(&'static str),

    #[error("Invalid ranking parameter: {0}")]
    InvalidParameter(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    pub weights: ScoringWeights,

    /// Highest social boost, reached when every reviewer is trusted
    pub max_social_boost: f64,
    pub max_rating: f64,

    // Popularity
    pub popularity_min_reviews: usize,
    /// Places rated below this get `low_rated_popularity` regardless of volume
    pub popularity_rating_floor: f64,
    pub low_rated_popularity: f64,
    /// Review count at which volume alone maxes out popularity
    pub popularity_saturation_reviews: usize,
    pub popularity_bonus_rating: f64,
    pub popularity_bonus: f64,

    // Novelty, ages in days
    pub novelty_unknown: f64,
    pub novelty_fresh_days: f64,
    pub novelty_decay_end_days: f64,
    /// Novelty reached at the end of the decay window
    pub novelty_decay_floor: f64,
    pub novelty_stale: f64,

    // Query classification and inclusion
    pub specific_max_categories: usize,
    pub general_min_categories: usize,
    pub general_max_preferred_tags: usize,
    pub general_min_rating: f64,
    pub mixed_min_rating: f64,
    pub fallback_min_rating: f64,

    // Diversity
    /// Diversity runs only with strictly more candidates than this
    pub diversity_min_candidates: usize,
    pub diversity_max_categories: usize,
    pub diversity_max_results: usize,

    // Sizes
    pub fetch_limit: usize,
    pub result_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            max_social_boost: 0.5,
            max_rating: 5.0,
            popularity_min_reviews: 2,
            popularity_rating_floor: 3.5,
            low_rated_popularity: 0.1,
            popularity_saturation_reviews: 20,
            popularity_bonus_rating: 4.0,
            popularity_bonus: 0.2,
            novelty_unknown: 0.5,
            novelty_fresh_days: 30.0,
            novelty_decay_end_days: 90.0,
            novelty_decay_floor: 0.3,
            novelty_stale: 0.1,
            specific_max_categories: 3,
            general_min_categories: 5,
            general_max_preferred_tags: 2,
            general_min_rating: 3.5,
            mixed_min_rating: 4.5,
            fallback_min_rating: 4.0,
            diversity_min_candidates: 5,
            diversity_max_categories: 10,
            diversity_max_results: 15,
            fetch_limit: 100,
            result_limit: 20,
        }
    }
}

impl RankingConfig {
    const WEIGHT_TOLERANCE: f64 = 1e-9;

    pub fn validate(&self) -> Result<(), RankingConfigError> {
        for (name, weight) in self.weights.named() {
            if weight < 0.0 {
                return Err(RankingConfigError::NegativeWeight(name));
            }
        }

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > Self::WEIGHT_TOLERANCE {
            return Err(RankingConfigError::WeightsDoNotSumToOne(sum));
        }

        if self.max_social_boost <= 0.0 {
            return Err(RankingConfigError::InvalidParameter("max_social_boost must be positive"));
        }
        if self.max_rating <= 0.0 {
            return Err(RankingConfigError::InvalidParameter("max_rating must be positive"));
        }
        if self.popularity_saturation_reviews == 0 {
            return Err(RankingConfigError::InvalidParameter(
                "popularity_saturation_reviews must be positive",
            ));
        }
        if self.novelty_decay_end_days <= self.novelty_fresh_days {
            return Err(RankingConfigError::InvalidParameter(
                "novelty decay window must end after it starts",
            ));
        }
        if self.result_limit == 0 || self.fetch_limit < self.result_limit {
            return Err(RankingConfigError::InvalidParameter(
                "fetch_limit must be at least result_limit, which must be positive",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_pinned() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.tag_match, 0.35);
        assert_eq!(weights.social_trust, 0.25);
        assert_eq!(weights.popularity, 0.20);
        assert_eq!(weights.quality, 0.15);
        assert_eq!(weights.novelty, 0.05);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(RankingConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = RankingConfig::default();
        config.weights.novelty = 0.10;
        assert!(matches!(
            config.validate(),
            Err(RankingConfigError::WeightsDoNotSumToOne(_))
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = RankingConfig::default();
        config.weights.novelty = -0.05;
        config.weights.tag_match = 0.45;
        assert_eq!(
            config.validate(),
            Err(RankingConfigError::NegativeWeight("novelty"))
        );
    }

    #[test]
    fn test_fetch_limit_below_result_limit_rejected() {
        let config = RankingConfig {
            fetch_limit: 10,
            ..RankingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RankingConfigError::InvalidParameter(_))
        ));
    }
}
